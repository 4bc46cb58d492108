//! Package introspection.
//!
//! A package is a zip archive holding two XML metadata documents — the
//! package descriptor and the domain/sizing descriptor — plus the raw disk
//! payload. Inspection extracts the display name and sizing hints and
//! unpacks the disk into the working directory. A missing required entry
//! aborts the whole pipeline.

use std::io::{Read, Seek};
use std::path::Path;

use roxmltree::Document;
use zip::ZipArchive;

use vmship_core::error::{Result, ShipError};

use crate::interact::OperatorPrompt;
use crate::workdir::RAW_DISK_FILE;

/// Archive entry holding the package descriptor.
const PACKAGE_DESCRIPTOR: &str = "vmnetx-package.xml";
/// Archive entry holding the domain/sizing descriptor.
const DOMAIN_DESCRIPTOR: &str = "domain.xml";

/// Display names that require operator disambiguation.
const PLACEHOLDER_NAMES: &[&str] = &["", "Virtual Machine"];

/// CPU count used when the domain descriptor has no `<vcpu>` element.
const DEFAULT_CPUS: u32 = 1;
/// Memory in KiB used when the domain descriptor has no `<memory>` element.
const DEFAULT_MEMORY_KIB: u64 = 65536;
/// The archive-native memory unit is KiB; recipes use MiB. Integer division,
/// fractional remainders are dropped.
const KIB_PER_MIB: u64 = 1024;

/// Structured metadata read from a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    /// Human-readable image name; artifact label and recipe description.
    pub name: String,
    /// Requested CPU count.
    pub cpus: u32,
    /// Requested memory in MiB.
    pub memory_mib: u64,
}

/// Read package metadata and extract the raw disk into `extract_dir`.
///
/// An empty or placeholder display name blocks on the operator prompt until
/// a usable name is supplied.
pub fn inspect(
    package: &Path,
    extract_dir: &Path,
    prompt: &dyn OperatorPrompt,
) -> Result<PackageMetadata> {
    let file = std::fs::File::open(package).map_err(|e| {
        ShipError::InvalidPackage(format!("cannot open {}: {e}", package.display()))
    })?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| ShipError::InvalidPackage(format!("not a package archive: {e}")))?;

    let descriptor = read_entry(&mut archive, PACKAGE_DESCRIPTOR)?;
    let name = resolve_name(&display_name(&descriptor)?, prompt)?;

    let domain = read_entry(&mut archive, DOMAIN_DESCRIPTOR)?;
    let (cpus, memory_mib) = sizing(&domain)?;
    println!("cpus {cpus} memory {memory_mib}");

    println!("Extracting disk image");
    extract_disk(&mut archive, extract_dir)?;

    Ok(PackageMetadata {
        name,
        cpus,
        memory_mib,
    })
}

/// Read a whole archive entry as text.
fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut entry = archive
        .by_name(name)
        .map_err(|_| ShipError::InvalidPackage(format!("missing archive entry {name}")))?;
    let mut text = String::new();
    entry.read_to_string(&mut text)?;
    Ok(text)
}

/// Root `name` attribute of the package descriptor.
fn display_name(descriptor: &str) -> Result<String> {
    let doc = Document::parse(descriptor)
        .map_err(|e| ShipError::InvalidPackage(format!("bad package descriptor: {e}")))?;
    Ok(doc
        .root_element()
        .attribute("name")
        .unwrap_or_default()
        .to_string())
}

/// Loop the manual disambiguation gate until the name is usable.
fn resolve_name(name: &str, prompt: &dyn OperatorPrompt) -> Result<String> {
    let mut name = name.to_string();
    while PLACEHOLDER_NAMES.contains(&name.as_str()) {
        name = prompt.ask("VM image name: ")?;
    }
    println!("{name}");
    Ok(name)
}

/// `<vcpu>` and `<memory>` children of the domain root, with defaults.
fn sizing(domain: &str) -> Result<(u32, u64)> {
    let doc = Document::parse(domain)
        .map_err(|e| ShipError::InvalidPackage(format!("bad domain descriptor: {e}")))?;
    let root = doc.root_element();

    let cpus = child_text(root, "vcpu")
        .map(|text| text.trim().parse::<u32>())
        .transpose()
        .map_err(|e| ShipError::InvalidPackage(format!("bad vcpu value: {e}")))?
        .unwrap_or(DEFAULT_CPUS);

    let memory_kib = child_text(root, "memory")
        .map(|text| text.trim().parse::<u64>())
        .transpose()
        .map_err(|e| ShipError::InvalidPackage(format!("bad memory value: {e}")))?
        .unwrap_or(DEFAULT_MEMORY_KIB);

    Ok((cpus, memory_kib / KIB_PER_MIB))
}

/// Text of the first direct child with the given tag.
fn child_text<'a>(node: roxmltree::Node<'a, 'a>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
}

/// Stream the raw disk entry into `extract_dir`.
fn extract_disk<R: Read + Seek>(archive: &mut ZipArchive<R>, extract_dir: &Path) -> Result<()> {
    let mut entry = archive
        .by_name(RAW_DISK_FILE)
        .map_err(|_| ShipError::InvalidPackage(format!("missing archive entry {RAW_DISK_FILE}")))?;
    let mut out = std::fs::File::create(extract_dir.join(RAW_DISK_FILE))?;
    std::io::copy(&mut entry, &mut out)?;
    Ok(())
}
