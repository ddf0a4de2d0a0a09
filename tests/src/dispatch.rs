#![cfg(test)]
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use depot_common::config::Config;
use depot_common::organization::SponsorLevel;
use depot_common::request::{Caller, RequestOrigin};
use depot_core::dispatch::{InstallerDispatcher, ServeError};
use depot_core::gate::FileGate;

use crate::support::{self, RecordingForwarder, StaticDirectory, artifact_tree};

fn origin() -> RequestOrigin {
    RequestOrigin::new("http", "localhost:5000")
}

#[tokio::test]
async fn unknown_platform_is_a_client_error_before_any_file_access() {
    // A nonexistent root: had the dispatcher touched the file system,
    // the failure would surface as an I/O error instead.
    let dispatcher = support::dispatcher(
        Path::new("/nonexistent/depot-root"),
        FileGate::new(),
        StaticDirectory::default(),
        Arc::new(RecordingForwarder::replying(b"")),
    );

    let err = dispatcher
        .serve_installer("AmigaDesktop", None, &Caller::Anonymous, &origin())
        .await
        .unwrap_err();

    assert!(matches!(err, ServeError::UnknownPlatform(_)));
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn anonymous_desktop_download_brands_with_the_default_relay_code() {
    let tree = artifact_tree();
    let dispatcher = support::dispatcher(
        tree.path(),
        FileGate::new(),
        StaticDirectory::with_default_relay_code("RELAY1"),
        Arc::new(RecordingForwarder::replying(b"")),
    );

    let download = dispatcher
        .serve_installer("WindowsDesktop-x64", None, &Caller::Anonymous, &origin())
        .await
        .unwrap();

    assert_eq!(download.file_name, "Remotely_Desktop-[RELAY1].exe");
    assert_eq!(download.content_type, "application/octet-stream");
    assert_eq!(download.body, b"win64-desktop");
}

#[tokio::test]
async fn unbranded_desktop_download_is_served_under_the_bare_stem() {
    let tree = artifact_tree();
    let dispatcher = support::dispatcher(
        tree.path(),
        FileGate::new(),
        StaticDirectory::default(),
        Arc::new(RecordingForwarder::replying(b"")),
    );

    let download = dispatcher
        .serve_installer("WindowsDesktop-x86", None, &Caller::Anonymous, &origin())
        .await
        .unwrap();

    assert_eq!(download.file_name, "Remotely_Desktop");
    assert_eq!(download.body, b"win86-desktop");
}

#[tokio::test]
async fn authenticated_caller_brands_only_at_relay_tier() {
    let tree = artifact_tree();
    let directory = StaticDirectory::default()
        .organization("ORG1", SponsorLevel::Relay, Some("ABC123"))
        .organization("ORG2", SponsorLevel::Basic, Some("NOPE"))
        .member("alice", "ORG1")
        .member("bob", "ORG2");
    let dispatcher = support::dispatcher(
        tree.path(),
        FileGate::new(),
        directory,
        Arc::new(RecordingForwarder::replying(b"")),
    );

    let alice = Caller::Authenticated {
        user_name: "alice".to_string(),
    };
    let download = dispatcher
        .serve_installer("UbuntuDesktop", None, &alice, &origin())
        .await
        .unwrap();
    assert_eq!(download.file_name, "Remotely_Desktop-[ABC123]");

    // Basic sponsorship is below the relay tier; no branding.
    let bob = Caller::Authenticated {
        user_name: "bob".to_string(),
    };
    let download = dispatcher
        .serve_installer("UbuntuDesktop", None, &bob, &origin())
        .await
        .unwrap();
    assert_eq!(download.file_name, "Remotely_Desktop");
}

#[tokio::test]
async fn sponsored_installer_brands_with_relay_code() {
    let tree = artifact_tree();
    let directory =
        StaticDirectory::default().organization("ORG1", SponsorLevel::Relay, Some("ABC123"));
    let dispatcher = support::dispatcher(
        tree.path(),
        FileGate::new(),
        directory,
        Arc::new(RecordingForwarder::replying(b"")),
    );

    let download = dispatcher
        .serve_installer("WindowsInstaller", Some("ORG1"), &Caller::Anonymous, &origin())
        .await
        .unwrap();

    assert_eq!(download.file_name, "Remotely_Install-[ABC123].exe");
    assert_eq!(download.body, b"installer");
}

#[tokio::test]
async fn unsponsored_installer_brands_with_the_organization_id() {
    let tree = artifact_tree();
    let directory = StaticDirectory::default().organization("ORG9", SponsorLevel::None, None);
    let dispatcher = support::dispatcher(
        tree.path(),
        FileGate::new(),
        directory,
        Arc::new(RecordingForwarder::replying(b"")),
    );

    let download = dispatcher
        .serve_installer("WindowsInstaller", Some("ORG9"), &Caller::Anonymous, &origin())
        .await
        .unwrap();

    assert_eq!(download.file_name, "Remotely_Installer-[ORG9].exe");
}

#[tokio::test]
async fn installer_requires_a_known_organization() {
    let tree = artifact_tree();
    let dispatcher = support::dispatcher(
        tree.path(),
        FileGate::new(),
        StaticDirectory::default(),
        Arc::new(RecordingForwarder::replying(b"")),
    );

    let err = dispatcher
        .serve_installer("WindowsInstaller", None, &Caller::Anonymous, &origin())
        .await
        .unwrap_err();
    assert!(matches!(err, ServeError::MissingOrganization));

    let err = dispatcher
        .serve_installer("WindowsInstaller", Some("GHOST"), &Caller::Anonymous, &origin())
        .await
        .unwrap_err();
    assert!(matches!(err, ServeError::UnknownOrganization(_)));
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn install_script_is_patched_with_host_and_organization() {
    let tree = artifact_tree();
    let gate = FileGate::new();
    let directory = StaticDirectory::default();
    let dispatcher = InstallerDispatcher::new(
        tree.path(),
        gate,
        Arc::new(directory),
        Arc::new(RecordingForwarder::replying(b"")),
        Config {
            redirect_to_https: true,
        },
    );

    let download = dispatcher
        .serve_installer("UbuntuInstaller-x64", Some("ORG1"), &Caller::Anonymous, &origin())
        .await
        .unwrap();

    assert_eq!(download.file_name, "Install-Ubuntu-x64.sh");
    let text = String::from_utf8(download.body).unwrap();
    assert_eq!(
        text,
        "#!/bin/bash\nHostName=\"https://localhost:5000\"\nOrganization=\"ORG1\"\nstart_client"
    );
}

#[tokio::test]
async fn legacy_script_aliases_serve_the_same_artifact() {
    let tree = artifact_tree();
    let dispatcher = support::dispatcher(
        tree.path(),
        FileGate::new(),
        StaticDirectory::default(),
        Arc::new(RecordingForwarder::replying(b"")),
    );

    let old = dispatcher
        .serve_installer("Manjaro-x64", Some("ORG1"), &Caller::Anonymous, &origin())
        .await
        .unwrap();
    let new = dispatcher
        .serve_installer("ManjaroInstaller-x64", Some("ORG1"), &Caller::Anonymous, &origin())
        .await
        .unwrap();

    assert_eq!(old, new);
    assert_eq!(old.file_name, "Install-Manjaro-x64.sh");
}

#[tokio::test]
async fn malformed_script_fails_loudly_and_releases_the_gate() {
    let tree = artifact_tree();
    std::fs::write(
        tree.path().join("Install-Ubuntu-x64.sh"),
        "#!/bin/bash\nHostName=\n",
    )
    .unwrap();

    let gate = FileGate::new();
    let dispatcher = support::dispatcher(
        tree.path(),
        gate.clone(),
        StaticDirectory::default(),
        Arc::new(RecordingForwarder::replying(b"")),
    );

    let err = dispatcher
        .serve_installer("Ubuntu-x64", Some("ORG1"), &Caller::Anonymous, &origin())
        .await
        .unwrap_err();

    assert!(matches!(err, ServeError::MalformedArtifact { .. }));
    assert_eq!(err.status_code(), 500);
    assert!(gate.is_free());
}

#[tokio::test]
async fn missing_artifact_fails_and_releases_the_gate() {
    let tree = artifact_tree();
    std::fs::remove_file(tree.path().join("Remotely_Desktop")).unwrap();

    let gate = FileGate::new();
    let dispatcher = support::dispatcher(
        tree.path(),
        gate.clone(),
        StaticDirectory::with_default_relay_code("RELAY1"),
        Arc::new(RecordingForwarder::replying(b"")),
    );

    let err = dispatcher
        .serve_installer("UbuntuDesktop", None, &Caller::Anonymous, &origin())
        .await
        .unwrap_err();

    assert!(matches!(err, ServeError::ArtifactIo { .. }));
    assert_eq!(err.status_code(), 500);
    assert!(gate.is_free());
}

#[tokio::test]
async fn held_gate_turns_into_a_request_timeout() {
    let tree = artifact_tree();
    let gate = FileGate::with_timeout(Duration::from_millis(20));
    let dispatcher = support::dispatcher(
        tree.path(),
        gate.clone(),
        StaticDirectory::default(),
        Arc::new(RecordingForwarder::replying(b"")),
    );

    let _held = gate.acquire().await.unwrap();
    let err = dispatcher
        .serve_installer("UbuntuDesktop", None, &Caller::Anonymous, &origin())
        .await
        .unwrap_err();

    assert!(matches!(err, ServeError::GateTimeout));
    assert_eq!(err.status_code(), 408);
}

#[tokio::test]
async fn clickonce_forwards_the_local_setup_and_serves_the_relay_reply() {
    let tree = artifact_tree();
    let forwarder = Arc::new(RecordingForwarder::replying(b"rewritten-setup"));
    let dispatcher = support::dispatcher(
        tree.path(),
        FileGate::new(),
        StaticDirectory::default(),
        forwarder.clone(),
    );

    let download = dispatcher
        .serve_clickonce_setup("x64", "ORG1", &origin())
        .await
        .unwrap();

    assert_eq!(download.file_name, "setup.exe");
    assert_eq!(download.body, b"rewritten-setup");

    let calls = forwarder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].setup_bytes, b"setup-x64");
    assert_eq!(calls[0].host_url, "http://localhost:5000");
    assert_eq!(calls[0].organization_id, "ORG1");
}

#[tokio::test]
async fn clickonce_rejects_unknown_architectures_without_forwarding() {
    let tree = artifact_tree();
    let forwarder = Arc::new(RecordingForwarder::replying(b""));
    let dispatcher = support::dispatcher(
        tree.path(),
        FileGate::new(),
        StaticDirectory::default(),
        forwarder.clone(),
    );

    let err = dispatcher
        .serve_clickonce_setup("arm64", "ORG1", &origin())
        .await
        .unwrap_err();

    assert!(matches!(err, ServeError::UnknownArchitecture(_)));
    assert_eq!(err.status_code(), 400);
    assert!(forwarder.calls().is_empty());
}

#[tokio::test]
async fn relay_failure_surfaces_as_a_forwarding_error() {
    let tree = artifact_tree();
    let dispatcher = support::dispatcher(
        tree.path(),
        FileGate::new(),
        StaticDirectory::default(),
        Arc::new(RecordingForwarder::failing(503)),
    );

    let err = dispatcher
        .serve_clickonce_setup("x86", "ORG1", &origin())
        .await
        .unwrap_err();

    assert!(matches!(err, ServeError::Forwarding(_)));
    assert_eq!(err.status_code(), 502);
}

#[tokio::test]
async fn clickonce_proceeds_while_the_gate_is_held() {
    let tree = artifact_tree();
    let gate = FileGate::with_timeout(Duration::from_millis(20));
    let dispatcher = support::dispatcher(
        tree.path(),
        gate.clone(),
        StaticDirectory::default(),
        Arc::new(RecordingForwarder::replying(b"ok")),
    );

    let _held = gate.acquire().await.unwrap();

    let download = dispatcher
        .serve_clickonce_setup("x64", "ORG1", &origin())
        .await
        .expect("forwarding does not contend for the file gate");
    assert_eq!(download.body, b"ok");
}
