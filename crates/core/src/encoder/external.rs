//! Encoder implementation driving the flac, lame and sox binaries.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::{Child, Command};
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

use super::config::EncoderConfig;
use super::error::EncoderError;
use super::traits::Encoder;
use super::types::{EncodeJob, EncodeResult, ProcessStage};
use crate::process::{command_line, Captured};
use crate::request::TargetFormat;

/// Encoder built on external command line tools.
pub struct ExternalEncoder {
    config: EncoderConfig,
}

impl ExternalEncoder {
    /// Creates a new encoder with the given configuration.
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Creates an encoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EncoderConfig::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Builds flac arguments decoding to stdout.
    fn build_decode_args(input_path: &Path) -> Vec<String> {
        vec![
            "-c".to_string(),
            "-d".to_string(),
            "--silent".to_string(),
            input_path.to_string_lossy().to_string(),
        ]
    }

    /// Builds lame arguments reading PCM from stdin.
    fn build_encode_args(
        &self,
        target: &TargetFormat,
        output_path: &Path,
    ) -> Result<Vec<String>, EncoderError> {
        // Joint stereo, best quality algorithm
        let mut args = vec![
            "-m".to_string(),
            "j".to_string(),
            "-q".to_string(),
            "0".to_string(),
        ];

        match target {
            TargetFormat::Vbr0 => {
                args.extend(["--vbr-new".to_string(), "-V".to_string(), "0".to_string()]);
            }
            TargetFormat::Cbr320 => {
                args.extend(["-b".to_string(), "320".to_string()]);
            }
            TargetFormat::FlacResample { .. } => {
                return Err(EncoderError::invalid_job(
                    "lame cannot produce a FLAC resample",
                ));
            }
        }

        args.extend(self.config.extra_lame_args.iter().cloned());

        args.push("-".to_string());
        args.push(output_path.to_string_lossy().to_string());

        Ok(args)
    }

    /// Builds sox arguments for a 16 bit resample with shaped dither.
    fn build_resample_args(input_path: &Path, output_path: &Path, sample_rate: u32) -> Vec<String> {
        vec![
            // Guard against clipping
            "-G".to_string(),
            input_path.to_string_lossy().to_string(),
            "-b".to_string(),
            "16".to_string(),
            output_path.to_string_lossy().to_string(),
            "rate".to_string(),
            "-v".to_string(),
            "-L".to_string(),
            sample_rate.to_string(),
            "dither".to_string(),
            "-s".to_string(),
        ]
    }

    fn spawn(
        program: &Path,
        args: &[String],
        stage: ProcessStage,
        stdin: Stdio,
        stdout: Stdio,
    ) -> Result<Child, EncoderError> {
        Command::new(program)
            .args(args)
            .stdin(stdin)
            .stdout(stdout)
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EncoderError::ToolNotFound {
                        stage,
                        path: program.to_path_buf(),
                    }
                } else {
                    EncoderError::Io(e)
                }
            })
    }

    fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Runs `flac -d | lame` with the two processes connected by a pipe.
    async fn run_mp3(&self, job: &EncodeJob) -> Result<(), EncoderError> {
        let decode_args = Self::build_decode_args(&job.input_path);
        let encode_args = self.build_encode_args(&job.target, &job.output_path)?;

        info!(
            "Conversion flac {} ...",
            command_line(&self.config.flac_path, &decode_args)
        );
        let mut decoder = Self::spawn(
            &self.config.flac_path,
            &decode_args,
            ProcessStage::Decode,
            Stdio::null(),
            Stdio::piped(),
        )?;

        let pcm: Stdio = decoder
            .stdout
            .take()
            .ok_or_else(|| {
                EncoderError::Io(std::io::Error::other("decoder stdout was not captured"))
            })?
            .try_into()?;

        debug!(
            "... to {}",
            command_line(&self.config.lame_path, &encode_args)
        );
        // A failed spawn drops the decoder, which kills it
        let encoder = Self::spawn(
            &self.config.lame_path,
            &encode_args,
            ProcessStage::Encode,
            pcm,
            Stdio::piped(),
        )?;

        let joined = timeout(self.timeout_duration(), async {
            tokio::try_join!(decoder.wait_with_output(), encoder.wait_with_output())
        })
        .await;

        let (decoded, encoded) = match joined {
            Ok(outputs) => outputs?,
            // Dropping the wait futures kills both children
            Err(_) => {
                return Err(EncoderError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };

        let decoded = Captured::from(decoded);
        let encoded = Captured::from(encoded);
        decoded.log("flac");
        encoded.log("lame");

        // A decoder dying mid-stream still lets lame finish on a truncated
        // stream, so the decoder status is checked first.
        if !decoded.status.success() {
            return Err(EncoderError::process_failed(
                ProcessStage::Decode,
                decoded.status.code(),
                decoded.stderr_text(),
            ));
        }
        if !encoded.status.success() {
            return Err(EncoderError::process_failed(
                ProcessStage::Encode,
                encoded.status.code(),
                encoded.stderr_text(),
            ));
        }

        Ok(())
    }

    /// Runs a single sox resample.
    async fn run_resample(&self, job: &EncodeJob, sample_rate: u32) -> Result<(), EncoderError> {
        if sample_rate == 0 {
            return Err(EncoderError::invalid_job("sample rate must be positive"));
        }

        let args = Self::build_resample_args(&job.input_path, &job.output_path, sample_rate);
        info!(
            "Resampling {} ...",
            command_line(&self.config.sox_path, &args)
        );

        let child = Self::spawn(
            &self.config.sox_path,
            &args,
            ProcessStage::Resample,
            Stdio::null(),
            Stdio::piped(),
        )?;

        let output = match timeout(self.timeout_duration(), child.wait_with_output()).await {
            Ok(output) => Captured::from(output?),
            Err(_) => {
                return Err(EncoderError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };
        output.log("sox");

        if !output.status.success() {
            return Err(EncoderError::process_failed(
                ProcessStage::Resample,
                output.status.code(),
                output.stderr_text(),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl Encoder for ExternalEncoder {
    fn name(&self) -> &str {
        "external"
    }

    async fn encode(&self, job: &EncodeJob) -> Result<EncodeResult, EncoderError> {
        let start = Instant::now();

        if !tokio::fs::try_exists(&job.input_path).await? {
            return Err(EncoderError::InputNotFound {
                path: job.input_path.clone(),
            });
        }
        if job.input_path == job.output_path {
            return Err(EncoderError::invalid_job(
                "output path must differ from input path",
            ));
        }

        match job.target {
            TargetFormat::Vbr0 | TargetFormat::Cbr320 => self.run_mp3(job).await?,
            TargetFormat::FlacResample { sample_rate } => {
                self.run_resample(job, sample_rate).await?
            }
        }

        let output_meta = tokio::fs::metadata(&job.output_path)
            .await
            .map_err(|_| EncoderError::OutputMissing {
                path: job.output_path.clone(),
            })?;

        Ok(EncodeResult {
            output_path: job.output_path.clone(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
            tags_written: 0,
        })
    }
}
