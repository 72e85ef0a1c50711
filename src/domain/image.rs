//! Docker image reference formatting.
//!
//! The scheduler takes Docker root filesystems as URLs:
//! `docker:///library/nginx#latest` for Docker Hub and
//! `docker://registry.local:5000/team/web#v2` for anything else.

use thiserror::Error;

pub const DOCKER_HUB_INDEX: &str = "index.docker.io";
const DOCKER_HUB_ALIASES: [&str; 2] = [DOCKER_HUB_INDEX, "docker.io"];
const OFFICIAL_NAMESPACE: &str = "library";
const DEFAULT_TAG: &str = "latest";
const MAX_NAME_LEN: usize = 255;
const MAX_TAG_LEN: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageReferenceError {
    #[error("docker image reference cannot be empty")]
    Empty,

    #[error("invalid repository name '{reference}': {reason}")]
    InvalidRepository { reference: String, reason: String },

    #[error("invalid tag '{tag}': only [A-Za-z0-9_.-] allowed, starting with [A-Za-z0-9_], at most 128 characters")]
    InvalidTag { tag: String },

    #[error("digest references are not supported: '{reference}'")]
    DigestUnsupported { reference: String },
}

/// A parsed `[registry/]repository[:tag]` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerImageReference {
    pub index: String,
    pub remote: String,
    pub tag: String,
}

impl DockerImageReference {
    pub fn parse(reference: &str) -> Result<Self, ImageReferenceError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ImageReferenceError::Empty);
        }
        if reference.contains('@') {
            return Err(ImageReferenceError::DigestUnsupported {
                reference: reference.to_string(),
            });
        }

        let (name, tag) = split_tag(reference);
        let tag = match tag {
            Some(tag) => {
                validate_tag(tag)?;
                tag.to_string()
            }
            None => DEFAULT_TAG.to_string(),
        };

        let (index, remote) = split_index(name);
        let invalid = |reason: &str| ImageReferenceError::InvalidRepository {
            reference: reference.to_string(),
            reason: reason.to_string(),
        };

        if !is_valid_host(index) {
            return Err(invalid("invalid registry host"));
        }
        if remote.is_empty() {
            return Err(invalid("repository path is empty"));
        }
        if remote.len() > MAX_NAME_LEN {
            return Err(invalid("repository path is longer than 255 characters"));
        }
        if let Some(component) = remote.split('/').find(|c| !is_valid_component(c)) {
            return Err(invalid(&format!(
                "path component '{component}' must be lowercase alphanumerics separated by '.', '_' or '-'"
            )));
        }

        let remote = if index == DOCKER_HUB_INDEX && !remote.contains('/') {
            format!("{OFFICIAL_NAMESPACE}/{remote}")
        } else {
            remote.to_string()
        };

        Ok(Self {
            index: index.to_string(),
            remote,
            tag,
        })
    }

    #[must_use]
    pub fn is_docker_hub(&self) -> bool {
        self.index == DOCKER_HUB_INDEX
    }

    /// Root filesystem URL understood by the scheduler.
    #[must_use]
    pub fn rootfs_url(&self) -> String {
        if self.is_docker_hub() {
            format!("docker:///{}#{}", self.remote, self.tag)
        } else {
            format!("docker://{}/{}#{}", self.index, self.remote, self.tag)
        }
    }
}

/// Turn a human image path into the scheduler's root filesystem URL.
pub fn format_for_receptor(docker_image_path: &str) -> Result<String, ImageReferenceError> {
    DockerImageReference::parse(docker_image_path).map(|reference| reference.rootfs_url())
}

/// A `:` after the last `/` starts the tag; earlier ones belong to a registry port.
fn split_tag(reference: &str) -> (&str, Option<&str>) {
    match reference.rfind(':') {
        Some(colon) if !reference[colon..].contains('/') => {
            (&reference[..colon], Some(&reference[colon + 1..]))
        }
        _ => (reference, None),
    }
}

/// The first path component is a registry when it looks like a host.
fn split_index(name: &str) -> (&str, &str) {
    match name.split_once('/') {
        Some((first, rest))
            if first.contains('.') || first.contains(':') || first == "localhost" =>
        {
            if DOCKER_HUB_ALIASES.contains(&first) {
                (DOCKER_HUB_INDEX, rest)
            } else {
                (first, rest)
            }
        }
        _ => (DOCKER_HUB_INDEX, name),
    }
}

fn is_valid_host(host: &str) -> bool {
    let (hostname, port) = match host.rsplit_once(':') {
        Some((hostname, port)) => (hostname, Some(port)),
        None => (host, None),
    };

    let port_ok = port.map_or(true, |port| {
        !port.is_empty() && port.len() <= 5 && port.chars().all(|c| c.is_ascii_digit())
    });
    let hostname_ok = !hostname.is_empty()
        && hostname
            .split('.')
            .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));

    port_ok && hostname_ok
}

fn is_valid_component(component: &str) -> bool {
    let bytes = component.as_bytes();
    let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
        return false;
    };
    let alnum = |b: &u8| b.is_ascii_lowercase() || b.is_ascii_digit();

    alnum(first)
        && alnum(last)
        && bytes.iter().all(|b| alnum(b) || matches!(b, b'.' | b'_' | b'-'))
        && !component.contains("..")
}

fn validate_tag(tag: &str) -> Result<(), ImageReferenceError> {
    let valid = tag.len() <= MAX_TAG_LEN
        && tag
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));

    if valid {
        Ok(())
    } else {
        Err(ImageReferenceError::InvalidTag {
            tag: tag.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn official_image_gets_library_namespace_and_latest_tag() {
        assert_eq!(
            format_for_receptor("nginx").unwrap(),
            "docker:///library/nginx#latest"
        );
    }

    #[test]
    fn docker_hub_user_image_with_tag() {
        assert_eq!(
            format_for_receptor("cloudfoundry/lattice-app:v1.2").unwrap(),
            "docker:///cloudfoundry/lattice-app#v1.2"
        );
    }

    #[test]
    fn explicit_docker_hub_host_is_normalized() {
        assert_eq!(
            format_for_receptor("docker.io/redis:7").unwrap(),
            "docker:///library/redis#7"
        );
    }

    #[test]
    fn private_registry_keeps_host_and_port() {
        assert_eq!(
            format_for_receptor("registry.local:5000/team/web").unwrap(),
            "docker://registry.local:5000/team/web#latest"
        );
        assert_eq!(
            format_for_receptor("localhost/app:dev").unwrap(),
            "docker://localhost/app#dev"
        );
    }

    #[test]
    fn rejects_malformed_references() {
        assert_eq!(format_for_receptor("  "), Err(ImageReferenceError::Empty));
        assert!(matches!(
            format_for_receptor("Ubuntu"),
            Err(ImageReferenceError::InvalidRepository { .. })
        ));
        assert!(matches!(
            format_for_receptor("team//web"),
            Err(ImageReferenceError::InvalidRepository { .. })
        ));
        assert!(matches!(
            format_for_receptor("web:-bad"),
            Err(ImageReferenceError::InvalidTag { .. })
        ));
        assert!(matches!(
            format_for_receptor("web@sha256:abc"),
            Err(ImageReferenceError::DigestUnsupported { .. })
        ));
    }
}
