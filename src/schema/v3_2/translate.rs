//! Translation of 3.1.0 configs into 3.2.0, and normalization of 3.2.0 configs

use crate::schema::{v3_1 as old, v3_2 as new};
use crate::structural_translation;
use crate::translate::{TranslateFrom, Translator};

// Types whose shape did not change get the same field list for the upgrade
// and for the same-schema pass.
structural_translation!(old::Config => new::Config { ignition, passwd, storage, systemd });
structural_translation!(new::Config => new::Config { ignition, passwd, storage, systemd });
structural_translation!(old::Ignition => new::Ignition {
    version, config, security, timeouts, proxy,
});
structural_translation!(new::Ignition => new::Ignition {
    version, config, security, timeouts, proxy,
});
structural_translation!(old::IgnitionConfig => new::IgnitionConfig { merge, replace });
structural_translation!(new::IgnitionConfig => new::IgnitionConfig { merge, replace });
structural_translation!(old::Resource => new::Resource {
    compression, http_headers, source, verification,
});
structural_translation!(new::Resource => new::Resource {
    compression, http_headers, source, verification,
});
structural_translation!(old::HttpHeader => new::HttpHeader { name, value });
structural_translation!(new::HttpHeader => new::HttpHeader { name, value });
structural_translation!(old::Verification => new::Verification { hash });
structural_translation!(new::Verification => new::Verification { hash });
structural_translation!(old::Security => new::Security { tls });
structural_translation!(new::Security => new::Security { tls });
structural_translation!(old::Tls => new::Tls { certificate_authorities });
structural_translation!(new::Tls => new::Tls { certificate_authorities });
structural_translation!(old::Proxy => new::Proxy { http_proxy, https_proxy, no_proxy });
structural_translation!(new::Proxy => new::Proxy { http_proxy, https_proxy, no_proxy });
structural_translation!(old::Timeouts => new::Timeouts { http_response_headers, http_total });
structural_translation!(new::Timeouts => new::Timeouts { http_response_headers, http_total });
structural_translation!(old::Passwd => new::Passwd { users, groups });
structural_translation!(new::Passwd => new::Passwd { users, groups });
structural_translation!(old::NodeUser => new::NodeUser { id, name });
structural_translation!(new::NodeUser => new::NodeUser { id, name });
structural_translation!(old::NodeGroup => new::NodeGroup { id, name });
structural_translation!(new::NodeGroup => new::NodeGroup { id, name });
structural_translation!(old::Directory => new::Directory {
    path, overwrite, user, group, mode,
});
structural_translation!(new::Directory => new::Directory {
    path, overwrite, user, group, mode,
});
structural_translation!(old::File => new::File {
    path, overwrite, user, group, contents, append, mode,
});
structural_translation!(new::File => new::File {
    path, overwrite, user, group, contents, append, mode,
});
structural_translation!(old::Link => new::Link { path, overwrite, user, group, target, hard });
structural_translation!(new::Link => new::Link { path, overwrite, user, group, target, hard });
structural_translation!(old::Disk => new::Disk { device, partitions, wipe_table });
structural_translation!(new::Disk => new::Disk { device, partitions, wipe_table });
structural_translation!(old::Filesystem => new::Filesystem {
    device, format, label, mount_options, options, path, uuid, wipe_filesystem,
});
structural_translation!(new::Filesystem => new::Filesystem {
    device, format, label, mount_options, options, path, uuid, wipe_filesystem,
});
structural_translation!(old::Raid => new::Raid { name, level, devices, spares, options });
structural_translation!(new::Raid => new::Raid { name, level, devices, spares, options });
structural_translation!(old::Systemd => new::Systemd { units });
structural_translation!(new::Systemd => new::Systemd { units });
structural_translation!(old::Unit => new::Unit { name, enabled, mask, contents, dropins });
structural_translation!(new::Unit => new::Unit { name, enabled, mask, contents, dropins });
structural_translation!(old::Dropin => new::Dropin { name, contents });
structural_translation!(new::Dropin => new::Dropin { name, contents });

// Types that grew fields in 3.2.0
structural_translation!(old::PasswdUser => new::PasswdUser {
    name, gecos, groups, home_dir, no_create_home, password_hash, ssh_authorized_keys, shell,
    system, uid,
});
structural_translation!(new::PasswdUser => new::PasswdUser {
    name, gecos, groups, home_dir, no_create_home, password_hash, ssh_authorized_keys, shell,
    should_exist, system, uid,
});
structural_translation!(old::PasswdGroup => new::PasswdGroup { name, gid, password_hash, system });
structural_translation!(new::PasswdGroup => new::PasswdGroup {
    name, gid, password_hash, should_exist, system,
});
structural_translation!(old::Storage => new::Storage {
    directories, disks, files, filesystems, links, raid,
});
structural_translation!(new::Storage => new::Storage {
    directories, disks, files, filesystems, links, luks, raid,
});
structural_translation!(old::Partition => new::Partition {
    label, number, size_mib, start_mib, type_guid, guid, wipe_partition_entry, should_exist,
});
structural_translation!(new::Partition => new::Partition {
    label, number, size_mib, start_mib, type_guid, guid, wipe_partition_entry, should_exist, resize,
});
structural_translation!(new::Luks => new::Luks {
    name, device, key_file, label, options, uuid, wipe_volume,
});

/// Registered for both `old::Ignition` and `new::Ignition` sources
fn translate_ignition<S>(old: S) -> new::Ignition
where
    S: 'static,
    new::Ignition: TranslateFrom<S>,
{
    // fresh translator, or this rule would be applied to its own input
    let mut ret: new::Ignition = Translator::new().translate(old);
    ret.version = new::VERSION.to_string();
    ret
}

/// Translate a 3.1.0 config into 3.2.0
pub fn translate(old: old::Config) -> new::Config {
    let mut tr = Translator::new();
    tr.add_custom_translator(translate_ignition::<old::Ignition>);
    tr.translate(old)
}

/// Pass a 3.2.0 config through the translator, forcing its version stamp to
/// the canonical 3.2.0 string.
pub fn normalize(cfg: new::Config) -> new::Config {
    let mut tr = Translator::new();
    tr.add_custom_translator(translate_ignition::<new::Ignition>);
    tr.translate(cfg)
}
