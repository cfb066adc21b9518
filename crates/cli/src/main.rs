//! peerwire-sdp: inspect and rewrite session descriptions from the command line

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use peerwire_sdp_core::{
    filter_codec_and_bitrate, parse, prefer_codec, write, BandwidthEncoding, CodecPreference,
    Description, PreferredCodecs, RtpCodecCapability, SdpType, SessionDescription,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Parse, write and transform SDP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log transform decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse SDP text into its JSON document
    Parse {
        /// SDP file (stdin if omitted)
        input: Option<PathBuf>,

        /// Emit compact JSON
        #[arg(long)]
        compact: bool,
    },
    /// Write a JSON document back to SDP text
    Write {
        /// JSON document (stdin if omitted)
        input: Option<PathBuf>,
    },
    /// Apply codec preferences and bitrate caps to an offer or answer
    Filter(FilterArgs),
    /// Narrow a JSON list of codec capabilities to a preferred codec
    Prefer {
        /// Codec name (opus, H264, VP8, VP9)
        #[arg(long)]
        codec: String,

        /// Substring the codec's format parameters must contain
        #[arg(long)]
        level: Option<String>,

        /// Required H.264 packetization mode
        #[arg(long)]
        mode: Option<u32>,

        /// JSON capability list (stdin if omitted)
        input: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// SDP file (stdin if omitted)
    input: Option<PathBuf>,

    /// Transform configuration (.toml or .json)
    #[arg(short, long, env = "PEERWIRE_SDP_CONFIG")]
    config: Option<PathBuf>,

    /// Description type
    #[arg(long = "type", default_value = "offer")]
    sdp_type: String,

    /// Preferred audio codec
    #[arg(long)]
    audio_codec: Option<String>,

    /// Preferred video codec
    #[arg(long)]
    video_codec: Option<String>,

    /// Level the preferred video codec must advertise
    #[arg(long, requires = "video_codec")]
    video_level: Option<String>,

    /// Packetization mode the preferred video codec must advertise
    #[arg(long, requires = "video_level")]
    video_mode: Option<u32>,

    /// Browser identification string used to pick the bandwidth encoding
    #[arg(long)]
    user_agent: Option<String>,
}

impl FilterArgs {
    fn preferred_codecs(&self) -> PreferredCodecs {
        PreferredCodecs {
            audio: self.audio_codec.as_deref().map(CodecPreference::new),
            video: self.video_codec.as_deref().map(|codec| CodecPreference {
                codec: codec.to_string(),
                level: self.video_level.clone(),
                mode: self.video_mode,
            }),
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_filter(args: &FilterArgs) -> Result<String> {
    let mut config = config::load_transform_config(args.config.as_deref())?;
    if let Some(user_agent) = &args.user_agent {
        config.bandwidth_encoding = BandwidthEncoding::from_user_agent(user_agent);
    }
    let sdp_type: SdpType = args.sdp_type.parse()?;
    let description = Description::new(sdp_type, config::read_input(args.input.as_deref())?);

    let preferred = args.preferred_codecs();
    debug!(?preferred, ?config, "Filtering {}", sdp_type);

    let original_len = description.sdp.len();
    let description = filter_codec_and_bitrate(description, Some(&preferred), &config);
    info!(before = original_len, after = description.sdp.len(), "Filtered description");
    Ok(description.sdp)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Parse { input, compact } => {
            let session = parse(&config::read_input(input.as_deref())?);
            let json = if *compact {
                serde_json::to_string(&session)?
            } else {
                session.to_json()?
            };
            println!("{}", json);
        }
        Command::Write { input } => {
            let json = config::read_input(input.as_deref())?;
            let session = SessionDescription::from_json(&json).context("Invalid session document")?;
            print!("{}", write(&session));
        }
        Command::Filter(args) => {
            print!("{}", run_filter(args)?);
        }
        Command::Prefer { codec, level, mode, input } => {
            let json = config::read_input(input.as_deref())?;
            let capabilities: Vec<RtpCodecCapability> =
                serde_json::from_str(&json).context("Invalid capability list")?;
            let preference = CodecPreference {
                codec: codec.clone(),
                level: level.clone(),
                mode: *mode,
            };
            let preferred = prefer_codec(&capabilities, &preference);
            println!("{}", serde_json::to_string_pretty(&preferred)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_args_to_preferences() {
        let cli = Cli::parse_from([
            "peerwire-sdp",
            "filter",
            "--video-codec",
            "H264",
            "--video-level",
            "42e01f",
            "--video-mode",
            "1",
            "offer.sdp",
        ]);
        let Command::Filter(args) = cli.command else {
            panic!("expected filter command");
        };
        let preferred = args.preferred_codecs();
        assert_eq!(preferred.audio, None);
        assert_eq!(
            preferred.video,
            Some(CodecPreference::new("H264").with_level("42e01f").with_mode(1))
        );
        assert_eq!(args.sdp_type, "offer");
    }

    #[test]
    fn test_level_requires_codec() {
        assert!(Cli::try_parse_from(["peerwire-sdp", "filter", "--video-level", "42e01f"]).is_err());
    }
}
