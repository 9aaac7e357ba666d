// Application and operating system details for the control surface's about line

use serde::Serialize;
use tauri::PackageInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub os: &'static str,
    pub family: &'static str,
    pub arch: &'static str,
}

impl AppInfo {
    pub fn collect(package: &PackageInfo) -> Self {
        Self {
            name: package.name.clone(),
            version: package.version.to_string(),
            os: std::env::consts::OS,
            family: std::env::consts::FAMILY,
            arch: std::env::consts::ARCH,
        }
    }

    /// One-line form, e.g. `framer 0.1.0 (linux/x86_64)`
    pub fn summary(&self) -> String {
        format!("{} {} ({}/{})", self.name, self.version, self.os, self.arch)
    }
}
