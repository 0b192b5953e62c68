//! Text files embedded in every package.
//!
//! The launcher reads its configuration from a flag file (one `name value` or
//! bare `name` per line). The init-system definition starts the launcher with
//! `-config <flag file>`.

use std::path::PathBuf;

use crate::options::BuildOptions;
use crate::target::InitSystem;

/// Install locations for one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  pub identifier: String,
  /// Binaries (`/usr/local/<identifier>/bin`).
  pub bin_dir: PathBuf,
  /// Configuration (`/etc/<identifier>`).
  pub etc_dir: PathBuf,
  /// Launcher state (`/var/<identifier>`).
  pub root_dir: PathBuf,
}

impl Layout {
  pub fn new(identifier: &str) -> Self {
    Self {
      identifier: identifier.to_string(),
      bin_dir: PathBuf::from("/usr/local").join(identifier).join("bin"),
      etc_dir: PathBuf::from("/etc").join(identifier),
      root_dir: PathBuf::from("/var").join(identifier),
    }
  }

  pub fn flag_file(&self) -> PathBuf {
    self.etc_dir.join("launcher.flags")
  }

  pub fn secret_file(&self) -> PathBuf {
    self.etc_dir.join("secret")
  }

  pub fn root_pem_file(&self) -> PathBuf {
    self.etc_dir.join("roots.pem")
  }

  pub fn binary(&self, name: &str) -> PathBuf {
    self.bin_dir.join(name)
  }

  /// Service definition location for `init`
  pub fn service_file(&self, init: InitSystem) -> PathBuf {
    match init {
      InitSystem::LaunchD => PathBuf::from("/Library/LaunchDaemons").join(format!("com.{}.launcher.plist", self.identifier)),
      InitSystem::SystemD => PathBuf::from("/etc/systemd/system").join(format!("launcher.{}.service", self.identifier)),
      InitSystem::Upstart => PathBuf::from("/etc/init").join(format!("launcher-{}.conf", self.identifier)),
    }
  }
}

/// Render the launcher flag file.
pub fn flag_file(options: &BuildOptions, layout: &Layout) -> String {
  let settings = options.settings();
  let mut lines = vec![
    format!("hostname {}", options.hostname()),
    format!("root_directory {}", layout.root_dir.display()),
    format!("osqueryd_path {}", layout.binary("osqueryd").display()),
  ];

  if options.embeds_secret() {
    lines.push(format!("enroll_secret_path {}", layout.secret_file().display()));
  }
  if settings.autoupdate {
    lines.push("autoupdate".to_string());
  }
  if !settings.update_channel.is_empty() {
    lines.push(format!("update_channel {}", settings.update_channel));
  }
  if settings.control {
    lines.push("control".to_string());
  }
  if !settings.control_hostname.is_empty() {
    lines.push(format!("control_hostname {}", settings.control_hostname));
  }
  if settings.disable_control_tls {
    lines.push("disable_control_tls".to_string());
  }
  if settings.initial_runner {
    lines.push("with_initial_runner".to_string());
  }
  if settings.insecure {
    lines.push("insecure".to_string());
  }
  if settings.insecure_grpc {
    lines.push("insecure_grpc".to_string());
  }
  if !options.cert_pins().is_empty() {
    lines.push(format!("cert_pins {}", options.cert_pins().joined()));
  }
  if options.root_pem().is_some() {
    lines.push(format!("root_pem {}", layout.root_pem_file().display()));
  }

  let mut out = lines.join("\n");
  out.push('\n');
  out
}

/// Render the service definition for `init`.
pub fn service_file(init: InitSystem, layout: &Layout) -> String {
  let launcher = layout.binary("launcher");
  let flags = layout.flag_file();
  match init {
    InitSystem::LaunchD => format!(
      r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>Label</key>
  <string>com.{id}.launcher</string>
  <key>ProgramArguments</key>
  <array>
    <string>{launcher}</string>
    <string>-config</string>
    <string>{flags}</string>
  </array>
  <key>KeepAlive</key>
  <true/>
  <key>RunAtLoad</key>
  <true/>
  <key>StandardOutPath</key>
  <string>/var/log/{id}/launcher-stdout.log</string>
  <key>StandardErrorPath</key>
  <string>/var/log/{id}/launcher-stderr.log</string>
</dict>
</plist>
"#,
      id = layout.identifier,
      launcher = launcher.display(),
      flags = flags.display(),
    ),
    InitSystem::SystemD => format!(
      "[Unit]\n\
       Description=Launcher agent ({id})\n\
       After=network.service syslog.service\n\
       \n\
       [Service]\n\
       ExecStart={launcher} -config {flags}\n\
       Restart=on-failure\n\
       RestartSec=3\n\
       \n\
       [Install]\n\
       WantedBy=multi-user.target\n",
      id = layout.identifier,
      launcher = launcher.display(),
      flags = flags.display(),
    ),
    InitSystem::Upstart => format!(
      "description \"Launcher agent ({id})\"\n\
       start on runlevel [2345]\n\
       stop on runlevel [!2345]\n\
       respawn\n\
       respawn limit 10 5\n\
       exec {launcher} -config {flags}\n",
      id = layout.identifier,
      launcher = launcher.display(),
      flags = flags.display(),
    ),
  }
}
