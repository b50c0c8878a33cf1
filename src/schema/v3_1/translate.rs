//! Translation of 3.0.0 configs into 3.1.0

use crate::schema::{v3_0 as old, v3_1 as new};
use crate::structural_translation;
use crate::translate::Translator;

structural_translation!(old::Config => new::Config { ignition, passwd, storage, systemd });
structural_translation!(old::Ignition => new::Ignition { version, config, security, timeouts });
structural_translation!(old::IgnitionConfig => new::IgnitionConfig { merge, replace });
structural_translation!(old::ConfigReference => new::Resource { source, verification });
structural_translation!(old::FileContents => new::Resource { compression, source, verification });
structural_translation!(old::Verification => new::Verification { hash });
structural_translation!(old::Security => new::Security { tls });
structural_translation!(old::Tls => new::Tls { certificate_authorities });
structural_translation!(old::Timeouts => new::Timeouts { http_response_headers, http_total });

structural_translation!(old::Passwd => new::Passwd { users, groups });
structural_translation!(old::PasswdUser => new::PasswdUser {
    name, gecos, groups, home_dir, no_create_home, password_hash, ssh_authorized_keys, shell,
    system, uid,
});
structural_translation!(old::PasswdGroup => new::PasswdGroup { name, gid, password_hash, system });

structural_translation!(old::Storage => new::Storage {
    directories, disks, files, filesystems, links, raid,
});
structural_translation!(old::NodeUser => new::NodeUser { id, name });
structural_translation!(old::NodeGroup => new::NodeGroup { id, name });
structural_translation!(old::Directory => new::Directory { path, overwrite, user, group, mode });
structural_translation!(old::File => new::File {
    path, overwrite, user, group, contents, append, mode,
});
structural_translation!(old::Link => new::Link { path, overwrite, user, group, target, hard });
structural_translation!(old::Disk => new::Disk { device, partitions, wipe_table });
structural_translation!(old::Partition => new::Partition {
    label, number, size_mib, start_mib, type_guid, guid, wipe_partition_entry, should_exist,
});
structural_translation!(old::Filesystem => new::Filesystem {
    device, format, label, mount_options, options, path, uuid, wipe_filesystem,
});
structural_translation!(old::Raid => new::Raid { name, level, devices, spares, options });

structural_translation!(old::Systemd => new::Systemd { units });
structural_translation!(old::Unit => new::Unit { name, enabled, mask, contents, dropins });
structural_translation!(old::Dropin => new::Dropin { name, contents });

fn translate_ignition(old: old::Ignition) -> new::Ignition {
    // fresh translator, or this rule would be applied to its own input
    let mut ret: new::Ignition = Translator::new().translate(old);
    ret.version = new::VERSION.to_string();
    ret
}

/// Translate a 3.0.0 config into 3.1.0
pub fn translate(old: old::Config) -> new::Config {
    let mut tr = Translator::new();
    tr.add_custom_translator(translate_ignition);
    tr.translate(old)
}
