//! Container artifact construction and publication.
//!
//! Wraps the encoded disk in a minimal scratch-based container image tagged
//! with the deployment identity. An unauthenticated push makes the artifact
//! publicly pullable, so it is gated on explicit operator confirmation;
//! authenticated pushes go out directly and the recipe marks the artifact
//! access-restricted instead.

use std::path::Path;
use std::process::{Command, Stdio};

use uuid::Uuid;

use vmship_core::error::Result;

use crate::interact::OperatorPrompt;
use crate::tool;
use crate::workdir::{DOCKERFILE, DOCKERIGNORE, ENCODED_DISK_FILE};

/// External container build/push/remove tool.
const CONTAINER_TOOL: &str = "docker";
/// Project URL recorded as artifact metadata.
const PROJECT_URL: &str = "https://github.com/cmusatyalab/vmship";
/// Owner and group the deployment's runtime user expects on the disk.
const DISK_OWNER: &str = "107:107";

/// Build context ignore rules: admit only the build instructions and
/// encoded disks.
const DOCKERIGNORE_RULES: &str = "*\n!Dockerfile\n!*.qcow2\n";

/// A locally built containerDisk image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerArtifact {
    /// Full image tag, `{registry}/{identity}:latest`.
    pub tag: String,
}

/// Outcome of the publication step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Artifact was pushed to the registry.
    Published,
    /// Operator declined the unauthenticated push; a clean outcome, not an
    /// error — the recipe still gets written for the unpublished artifact.
    Declined,
}

/// Tag for the containerDisk image of a deployment.
pub fn artifact_tag(registry: &str, identity: &Uuid) -> String {
    format!("{registry}/{identity}:latest")
}

/// Render the build instructions for the minimal containerDisk layer.
fn dockerfile(display_name: &str) -> String {
    format!(
        r#"FROM scratch
LABEL org.opencontainers.image.url="{PROJECT_URL}" \
      org.opencontainers.image.title="{display_name}"
ADD --chown={DISK_OWNER} {ENCODED_DISK_FILE} /disk/
"#
    )
}

/// Build the containerDisk image from the working directory.
///
/// The working directory doubles as the build context; the ignore rules
/// keep everything but the encoded disk out of the layer.
pub fn build(
    workdir: &Path,
    identity: &Uuid,
    display_name: &str,
    registry: &str,
) -> Result<ContainerArtifact> {
    println!("Creating containerDisk image");
    let tag = artifact_tag(registry, identity);
    std::fs::write(workdir.join(DOCKERIGNORE), DOCKERIGNORE_RULES)?;
    std::fs::write(workdir.join(DOCKERFILE), dockerfile(display_name))?;
    tool::run(
        CONTAINER_TOOL,
        Command::new(CONTAINER_TOOL)
            .args(["build", "-t", &tag])
            .arg(workdir),
    )?;
    Ok(ContainerArtifact { tag })
}

/// Push the artifact to its registry.
///
/// Without deploy credentials the operator must opt in to the push; with
/// credentials the confirmation gate is skipped.
pub fn publish(
    artifact: &ContainerArtifact,
    restricted: bool,
    prompt: &dyn OperatorPrompt,
) -> Result<PublishOutcome> {
    if !push_confirmed(restricted, prompt)? {
        return Ok(PublishOutcome::Declined);
    }
    println!("Publishing containerDisk image");
    tool::run(
        CONTAINER_TOOL,
        Command::new(CONTAINER_TOOL).args(["push", &artifact.tag]),
    )?;
    Ok(PublishOutcome::Published)
}

/// The confirmation gate applies only to unrestricted (public) pushes.
fn push_confirmed(restricted: bool, prompt: &dyn OperatorPrompt) -> Result<bool> {
    if restricted {
        return Ok(true);
    }
    prompt.confirm("Ok to push non-restricted image? [yes/no] ")
}

/// Remove the locally built image so converted artifacts do not accumulate.
pub fn remove_local(artifact: &ContainerArtifact) -> Result<()> {
    tool::run(
        CONTAINER_TOOL,
        Command::new(CONTAINER_TOOL)
            .args(["image", "rm", &artifact.tag])
            .stdout(Stdio::null()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Prompt with a fixed confirmation answer; panics on open questions.
    struct ConfirmPrompt {
        answer: bool,
        confirmed: RefCell<u32>,
    }

    impl ConfirmPrompt {
        fn new(answer: bool) -> Self {
            Self {
                answer,
                confirmed: RefCell::new(0),
            }
        }

        fn confirmations(&self) -> u32 {
            *self.confirmed.borrow()
        }
    }

    impl OperatorPrompt for ConfirmPrompt {
        fn ask(&self, prompt: &str) -> Result<String> {
            panic!("unexpected open question: {prompt}");
        }

        fn confirm(&self, _prompt: &str) -> Result<bool> {
            *self.confirmed.borrow_mut() += 1;
            Ok(self.answer)
        }
    }

    #[test]
    fn test_artifact_tag() {
        let identity = uuid::uuid!("2ea10a5d-6503-5f1a-8b38-a1f1e8d54b83");
        assert_eq!(
            artifact_tag("reg.example.com/proj", &identity),
            "reg.example.com/proj/2ea10a5d-6503-5f1a-8b38-a1f1e8d54b83:latest"
        );
    }

    #[test]
    fn test_dockerfile_contents() {
        let rendered = dockerfile("Windows 3.1");
        assert!(rendered.starts_with("FROM scratch\n"));
        assert!(rendered.contains("org.opencontainers.image.title=\"Windows 3.1\""));
        assert!(rendered.contains(&format!("org.opencontainers.image.url=\"{PROJECT_URL}\"")));
        assert!(rendered.contains("ADD --chown=107:107 disk.qcow2 /disk/"));
    }

    #[test]
    fn test_dockerignore_admits_only_disk_and_instructions() {
        assert_eq!(DOCKERIGNORE_RULES, "*\n!Dockerfile\n!*.qcow2\n");
    }

    #[test]
    fn test_restricted_push_skips_confirmation() {
        let prompt = ConfirmPrompt::new(false);
        assert!(push_confirmed(true, &prompt).unwrap());
        assert_eq!(prompt.confirmations(), 0);
    }

    #[test]
    fn test_unrestricted_push_requires_confirmation() {
        let prompt = ConfirmPrompt::new(true);
        assert!(push_confirmed(false, &prompt).unwrap());
        assert_eq!(prompt.confirmations(), 1);
    }

    #[test]
    fn test_declined_confirmation_blocks_push() {
        let prompt = ConfirmPrompt::new(false);
        assert!(!push_confirmed(false, &prompt).unwrap());
        assert_eq!(prompt.confirmations(), 1);
    }

    #[test]
    fn test_publish_declined_is_clean_outcome() {
        let artifact = ContainerArtifact {
            tag: "reg.example.com/proj/x:latest".to_string(),
        };
        let prompt = ConfirmPrompt::new(false);
        let outcome = publish(&artifact, false, &prompt).unwrap();
        assert_eq!(outcome, PublishOutcome::Declined);
    }
}
