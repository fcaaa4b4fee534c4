// fleet-deploy: Bulk file deployment across repository fleets
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ConfigError, FleetError, FleetResult, GitError, NetworkError, PlacementError};

fn http(status: u16, rate_limited: bool) -> NetworkError {
    NetworkError::HttpError {
        status,
        url: "https://api.github.com/orgs/acme/repos".to_string(),
        rate_limited,
    }
}

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingKey {
        section: "github".to_string(),
        key: "token".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"missing required config key 'token' in section '[github]'"
    );
}

#[test]
fn test_placement_error_display() {
    let err = PlacementError::Traversal("../outside".to_string());
    insta::assert_snapshot!(
        err.to_string(),
        @"target directory cannot contain parent directory references (..): ../outside"
    );
}

#[test]
fn test_fleet_error_size() {
    // Every variant is a single Box, so the enum is pointer-sized plus tag.
    let size = std::mem::size_of::<FleetError>();
    assert!(size <= 24, "FleetError is {size} bytes, expected <= 24");
}

#[test]
fn test_fleet_result_size() {
    let size = std::mem::size_of::<FleetResult<()>>();
    assert!(size <= 24, "FleetResult<()> is {size} bytes, expected <= 24");
}

#[test]
fn test_http_status_classification() {
    let cases = [
        (500, false, true),
        (502, false, true),
        (429, false, true),
        (403, true, true),
        (403, false, false),
        (404, false, false),
        (401, false, false),
    ];
    for (status, rate_limited, expected) in cases {
        assert_eq!(
            http(status, rate_limited).is_transient(),
            expected,
            "status {status} rate_limited={rate_limited}"
        );
    }
}

#[test]
fn test_timeout_and_decode_classification() {
    let timeout = NetworkError::Timeout {
        url: "https://api.github.com".to_string(),
    };
    let decode = NetworkError::Decode {
        url: "https://api.github.com".to_string(),
        message: "expected array".to_string(),
    };
    assert!(timeout.is_transient());
    assert!(!decode.is_transient());
}

#[test]
fn test_only_network_errors_are_transient() {
    let net: FleetError = http(503, false).into();
    let git: FleetError = GitError::CommandFailed {
        command: "git push".to_string(),
        message: "rejected".to_string(),
    }
    .into();
    assert!(net.is_transient());
    assert!(!git.is_transient());
    let io: FleetError = std::io::Error::other("disk full").into();
    assert!(!io.is_transient());
}
