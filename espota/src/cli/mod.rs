//! CLI utilities for the espota binary
//!
//! No stability guaranties apply

use std::{fs, path::PathBuf};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use miette::Result;

use self::config::Config;
use crate::{
    error::Error,
    ota::{compress_firmware, payload_checksum, protocol::DEFAULT_PORT, run_ota},
    progress::ProgressCallbacks,
};

pub mod config;

/// Upload a firmware image to a device
#[derive(Debug, Args)]
#[non_exhaustive]
pub struct UploadArgs {
    /// Firmware image to upload
    pub firmware: PathBuf,
    /// Host name or IP address of the device, tried in the order given
    #[arg(long = "host", short = 'H', value_name = "HOST")]
    pub hosts: Vec<String>,
    /// OTA port of the device
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
    /// OTA password of the device
    #[arg(long, env = "ESPOTA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Print the checksum and sizes of a firmware image
#[derive(Debug, Args)]
#[non_exhaustive]
pub struct ChecksumArgs {
    /// Firmware image to inspect
    pub firmware: PathBuf,
}

/// Progress callback implementations for use in `espota`
#[derive(Default)]
pub struct EspotaProgress {
    pb: Option<ProgressBar>,
}

impl ProgressCallbacks for EspotaProgress {
    /// Initialize the progress bar
    fn init(&mut self, total: usize) {
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40}] {bytes:>9}/{total_bytes:9} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");

        let pb = ProgressBar::new(total as u64)
            .with_message("Uploading")
            .with_style(style);

        self.pb = Some(pb);
    }

    /// Update the progress bar
    fn update(&mut self, current: usize) {
        if let Some(ref pb) = self.pb {
            pb.set_position(current as u64);
        }
    }

    /// End the progress bar
    fn finish(&mut self) {
        if let Some(ref pb) = self.pb {
            pb.finish_with_message("Done");
        }
    }
}

/// Run an upload, returning the process exit code
pub fn upload(args: UploadArgs, config: &Config) -> Result<i32> {
    let hosts = if args.hosts.is_empty() {
        config.hosts.clone()
    } else {
        args.hosts
    };
    if hosts.is_empty() {
        return Err(Error::NoHosts.into());
    }

    let port = args.port.or(config.port).unwrap_or(DEFAULT_PORT);
    let password = args.password.as_deref().or(config.password.as_deref());

    let mut progress = EspotaProgress::default();
    let (code, address) = run_ota(&hosts, port, password, &args.firmware, &mut progress);

    if let Some(address) = address {
        info!("Firmware uploaded to {address}");
    }

    Ok(code)
}

pub fn checksum(args: ChecksumArgs) -> Result<()> {
    let firmware = fs::read(&args.firmware)
        .map_err(|err| Error::FileOpenError(args.firmware.display().to_string(), err))?;
    let compressed = compress_firmware(&firmware)?;

    println!("Firmware:            {}", args.firmware.display());
    println!("Size:                {} bytes", firmware.len());
    println!("MD5:                 {}", payload_checksum(&firmware));
    println!("Compressed size:     {} bytes", compressed.len());
    println!("Compressed MD5:      {}", payload_checksum(&compressed));

    Ok(())
}
