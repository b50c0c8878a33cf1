//! Cross-version Translation Tests
//!
//! Documents in every supported version are parsed and brought up to 3.2.0.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use provision_config::schema::{self, v3_0, v3_1, v3_2};
use provision_config::{SchemaVersion, Translator};
use serde_json::Value;

const V3_0_DOC: &str = r#"{
  "ignition": {
    "version": "3.0.0",
    "config": {
      "merge": [{"source": "oem:///base.ign", "verification": {"hash": "sha512-aa"}}]
    },
    "security": {"tls": {"certificateAuthorities": [{"source": "data:,ca"}]}},
    "timeouts": {"httpTotal": 30}
  },
  "passwd": {
    "users": [{"name": "core", "sshAuthorizedKeys": ["ssh-ed25519 AAAA core"], "groups": ["wheel"]}]
  },
  "storage": {
    "disks": [{
      "device": "/dev/vda",
      "wipeTable": true,
      "partitions": [{"number": 1, "label": "root", "sizeMiB": 4096, "startMiB": 0}]
    }],
    "files": [{
      "path": "/etc/selinux/config",
      "mode": 420,
      "overwrite": true,
      "contents": {"source": "data:,%23%20This%20file%0A%0ASELINUX%3Dpermissive"}
    }],
    "links": [{"path": "/etc/localtime", "target": "/usr/share/zoneinfo/UTC"}]
  },
  "systemd": {
    "units": [{
      "name": "example.service",
      "enabled": true,
      "contents": "[Service]\nExecStart=/bin/true",
      "dropins": [{"name": "debug.conf", "contents": "[Service]\nEnvironment=DEBUG=1"}]
    }]
  }
}"#;

const V3_1_DOC: &str = r#"{
  "ignition": {
    "version": "3.1.0",
    "proxy": {"httpsProxy": "http://proxy.example:3128", "noProxy": ["10.0.0.0/8"]},
    "config": {
      "replace": {
        "source": "https://example.com/config.ign",
        "compression": "gzip",
        "httpHeaders": [{"name": "Authorization", "value": "Bearer x"}]
      }
    }
  },
  "passwd": {"groups": [{"name": "ops", "gid": 1200}]}
}"#;

/// Every field of the 3.0.0 schema set to a non-default value
const V3_0_FULL_DOC: &str = r#"{
  "ignition": {
    "version": "3.0.0",
    "config": {
      "merge": [{"source": "oem:///merge.ign", "verification": {"hash": "sha512-01"}}],
      "replace": {"source": "oem:///replace.ign", "verification": {"hash": "sha512-02"}}
    },
    "security": {
      "tls": {
        "certificateAuthorities": [{"source": "data:,ca", "verification": {"hash": "sha512-03"}}]
      }
    },
    "timeouts": {"httpResponseHeaders": 5, "httpTotal": 30}
  },
  "passwd": {
    "users": [{
      "name": "core",
      "gecos": "CoreOS Admin",
      "groups": ["wheel", "sudo"],
      "homeDir": "/var/home/core",
      "noCreateHome": true,
      "passwordHash": "$6$salt$hash",
      "sshAuthorizedKeys": ["ssh-ed25519 AAAA core"],
      "shell": "/bin/zsh",
      "system": true,
      "uid": 1000
    }],
    "groups": [{"name": "ops", "gid": 1200, "passwordHash": "$6$grp", "system": false}]
  },
  "storage": {
    "directories": [{
      "path": "/var/lib/app",
      "overwrite": true,
      "user": {"id": 1000, "name": "core"},
      "group": {"id": 1200, "name": "ops"},
      "mode": 493
    }],
    "disks": [{
      "device": "/dev/vda",
      "wipeTable": true,
      "partitions": [{
        "label": "root",
        "number": 4,
        "sizeMiB": 4096,
        "startMiB": 1,
        "typeGuid": "4f68bce3-e8cd-4db1-96e7-fbcaf984b709",
        "guid": "8a1b3c2d-0000-4000-8000-000000000001",
        "wipePartitionEntry": true,
        "shouldExist": true
      }]
    }],
    "files": [{
      "path": "/etc/motd",
      "overwrite": false,
      "user": {"id": 0, "name": "root"},
      "group": {"id": 0, "name": "root"},
      "contents": {"compression": "gzip", "source": "data:,hello", "verification": {"hash": "sha512-04"}},
      "append": [{"compression": "gzip", "source": "data:,more", "verification": {"hash": "sha512-05"}}],
      "mode": 420
    }],
    "filesystems": [{
      "device": "/dev/disk/by-partlabel/root",
      "format": "xfs",
      "label": "root",
      "mountOptions": ["noatime"],
      "options": ["-m", "reflink=1"],
      "path": "/sysroot",
      "uuid": "9f2d6e5a-0000-4000-8000-000000000002",
      "wipeFilesystem": true
    }],
    "links": [{
      "path": "/etc/localtime",
      "overwrite": true,
      "user": {"id": 0, "name": "root"},
      "group": {"id": 0, "name": "root"},
      "target": "/usr/share/zoneinfo/UTC",
      "hard": false
    }],
    "raid": [{
      "name": "data",
      "level": "raid1",
      "devices": ["/dev/vdb", "/dev/vdc"],
      "spares": 1,
      "options": ["--assume-clean"]
    }]
  },
  "systemd": {
    "units": [{
      "name": "example.service",
      "enabled": true,
      "mask": false,
      "contents": "[Service]\nExecStart=/bin/true",
      "dropins": [{"name": "debug.conf", "contents": "[Service]\nEnvironment=DEBUG=1"}]
    }]
  }
}"#;

/// Drop nulls, empty arrays and empty objects so that fields only the newer
/// schema carries don't show up as differences.
fn prune(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(items) => {
            let items: Vec<Value> = items.into_iter().filter_map(prune).collect();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        Value::Object(map) => {
            let map: serde_json::Map<String, Value> = map
                .into_iter()
                .filter_map(|(key, value)| prune(value).map(|value| (key, value)))
                .collect();
            (!map.is_empty()).then_some(Value::Object(map))
        }
        other => Some(other),
    }
}

#[test]
fn test_every_field_survives_translation() {
    let cfg = schema::parse(V3_0_FULL_DOC.as_bytes()).unwrap();
    assert_eq!(cfg.ignition.version, "3.2.0");

    let mut before: Value = serde_json::from_str(V3_0_FULL_DOC).unwrap();
    let mut after = serde_json::to_value(&cfg).unwrap();
    before["ignition"]["version"] = Value::from("any");
    after["ignition"]["version"] = Value::from("any");

    assert_eq!(prune(after), prune(before));
}

#[test]
fn test_v3_0_document_reaches_latest() {
    let cfg = schema::parse(V3_0_DOC.as_bytes()).unwrap();

    assert_eq!(cfg.ignition.version, SchemaVersion::LATEST.as_str());
    assert_eq!(cfg.ignition.timeouts.http_total, Some(30));

    let merge = &cfg.ignition.config.merge;
    assert_eq!(merge.len(), 1);
    assert_eq!(merge[0].source.as_deref(), Some("oem:///base.ign"));
    assert_eq!(merge[0].verification.hash.as_deref(), Some("sha512-aa"));
    assert!(merge[0].http_headers.is_empty());
    assert_eq!(cfg.ignition.config.replace, None);
    assert_eq!(
        cfg.ignition.security.tls.certificate_authorities[0].source.as_deref(),
        Some("data:,ca")
    );

    let user = &cfg.passwd.users[0];
    assert_eq!(user.name, "core");
    assert_eq!(user.groups, vec!["wheel"]);
    assert_eq!(user.should_exist, None);

    let disk = &cfg.storage.disks[0];
    assert_eq!(disk.wipe_table, Some(true));
    assert_eq!(disk.partitions[0].size_mib, Some(4096));
    assert_eq!(disk.partitions[0].label.as_deref(), Some("root"));
    assert_eq!(disk.partitions[0].resize, None);

    let file = &cfg.storage.files[0];
    assert_eq!(file.mode, Some(420));
    assert_eq!(file.overwrite, Some(true));
    assert!(file.contents.source.as_deref().unwrap().starts_with("data:,"));

    assert_eq!(cfg.storage.links[0].target, "/usr/share/zoneinfo/UTC");
    assert!(cfg.storage.luks.is_empty());

    let unit = &cfg.systemd.units[0];
    assert_eq!(unit.enabled, Some(true));
    assert_eq!(unit.dropins[0].name, "debug.conf");
}

#[test]
fn test_v3_1_document_reaches_latest() {
    let cfg = schema::parse(V3_1_DOC.as_bytes()).unwrap();

    assert_eq!(cfg.ignition.version, "3.2.0");
    assert_eq!(
        cfg.ignition.proxy.https_proxy.as_deref(),
        Some("http://proxy.example:3128")
    );
    assert_eq!(cfg.ignition.proxy.no_proxy, vec!["10.0.0.0/8"]);

    let replace = cfg.ignition.config.replace.as_ref().unwrap();
    assert_eq!(replace.compression.as_deref(), Some("gzip"));
    assert_eq!(replace.http_headers[0].name, "Authorization");
    assert_eq!(replace.http_headers[0].value.as_deref(), Some("Bearer x"));

    assert_eq!(cfg.passwd.groups[0].gid, Some(1200));
}

#[test]
fn test_stepwise_matches_parse() {
    let old: v3_0::Config = serde_json::from_str(V3_0_DOC).unwrap();
    let mid = v3_1::translate::translate(old);
    assert_eq!(mid.ignition.version, "3.1.0");
    let latest = v3_2::translate::translate(mid);
    assert_eq!(latest, schema::parse(V3_0_DOC.as_bytes()).unwrap());
}

#[test]
fn test_latest_round_trips_through_json() {
    let cfg = schema::parse(V3_0_DOC.as_bytes()).unwrap();
    let json = serde_json::to_vec(&cfg).unwrap();
    assert_eq!(schema::parse(&json).unwrap(), cfg);
}

#[test]
fn test_version_field_is_forced_even_if_source_lies() {
    let mut old: v3_1::Config = serde_json::from_str(V3_1_DOC).unwrap();
    old.ignition.version = "garbage".to_string();
    assert_eq!(v3_2::translate::translate(old).ignition.version, "3.2.0");
}

#[test]
fn test_nested_override_applied_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut tr = Translator::new();
    tr.add_custom_translator(move |ignition: v3_2::Ignition| -> v3_2::Ignition {
        counter.fetch_add(1, Ordering::SeqCst);
        let mut ret: v3_2::Ignition = Translator::new().translate(ignition);
        ret.version = "3.2.0".to_string();
        ret
    });

    let mut cfg = schema::parse(V3_1_DOC.as_bytes()).unwrap();
    cfg.ignition.version = "stale".to_string();
    let expected_proxy = cfg.ignition.proxy.clone();

    let out: v3_2::Config = tr.translate(cfg);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(out.ignition.version, "3.2.0");
    assert_eq!(out.ignition.proxy, expected_proxy);
}
