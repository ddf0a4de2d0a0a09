//! # Artifact Catalog
//!
//! Pure mapping from platform identifiers to locations inside the
//! pre-populated artifact root. The set of platforms is closed and known
//! at build time; adding one is a table edit here, and unknown identifiers
//! fall through to `None` so the dispatcher can reject them before any
//! file access happens.

use std::path::PathBuf;

use depot_common::forward::Architecture;

/// Closed set of platforms the depot distributes install artifacts for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    WindowsDesktopX64,
    WindowsDesktopX86,
    UbuntuDesktop,
    WindowsInstaller,
    ManjaroScript,
    UbuntuScript,
}

/// What the serve path must do with a resolved artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A desktop client binary, optionally branded with a relay code.
    DesktopBinary,
    /// The Windows installer, always branded per organization.
    OrganizationInstaller,
    /// A provisioning shell script patched with host and organization.
    InstallScript,
}

/// Where an artifact lives and how it is served.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// Location relative to the artifact root.
    pub relative_path: PathBuf,
    pub kind: ArtifactKind,
}

impl Platform {
    /// Exact-match resolution of a wire identifier.
    pub fn resolve(platform_id: &str) -> Option<Self> {
        match platform_id {
            "WindowsDesktop-x64" => Some(Self::WindowsDesktopX64),
            "WindowsDesktop-x86" => Some(Self::WindowsDesktopX86),
            "UbuntuDesktop" => Some(Self::UbuntuDesktop),
            "WindowsInstaller" => Some(Self::WindowsInstaller),
            // TODO: Drop the aliased identifiers once provisioning commands
            // distributed with the old names have cycled out of the field.
            "Manjaro-x64" | "ManjaroInstaller-x64" => Some(Self::ManjaroScript),
            "Ubuntu-x64" | "UbuntuInstaller-x64" => Some(Self::UbuntuScript),
            _ => None,
        }
    }

    pub fn descriptor(self) -> ArtifactDescriptor {
        let (path, kind) = match self {
            Self::WindowsDesktopX64 => ("Win-x64/Remotely_Desktop.exe", ArtifactKind::DesktopBinary),
            Self::WindowsDesktopX86 => ("Win-x86/Remotely_Desktop.exe", ArtifactKind::DesktopBinary),
            Self::UbuntuDesktop => ("Remotely_Desktop", ArtifactKind::DesktopBinary),
            Self::WindowsInstaller => ("Remotely_Installer.exe", ArtifactKind::OrganizationInstaller),
            Self::ManjaroScript => ("Install-Manjaro-x64.sh", ArtifactKind::InstallScript),
            Self::UbuntuScript => ("Install-Ubuntu-x64.sh", ArtifactKind::InstallScript),
        };

        ArtifactDescriptor {
            relative_path: PathBuf::from(path),
            kind,
        }
    }
}

/// Location of the local ClickOnce bootstrapper for a Windows build flavor.
///
/// Lives outside [`Platform`] because the ClickOnce flow selects by
/// architecture token, not platform identifier.
pub fn clickonce_setup_path(architecture: Architecture) -> PathBuf {
    match architecture {
        Architecture::X64 => PathBuf::from("Win-x64/ClickOnce/setup.exe"),
        Architecture::X86 => PathBuf::from("Win-x86/ClickOnce/setup.exe"),
    }
}
