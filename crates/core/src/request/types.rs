//! Types for conversion requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Token in an input directory name that gets replaced by the version label.
const SOURCE_TOKEN: &str = "FLAC";

/// Target encoding of one output version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TargetFormat {
    /// LAME VBR quality 0, joint stereo.
    Vbr0,
    /// LAME CBR 320 kbit/s, joint stereo.
    Cbr320,
    /// 16 bit FLAC at the given sample rate, with shaped dither.
    FlacResample { sample_rate: u32 },
}

impl TargetFormat {
    /// Returns the version label used in output directory names.
    pub fn label(&self) -> String {
        match self {
            Self::Vbr0 => "V0 (VBR)".to_string(),
            Self::Cbr320 => "320".to_string(),
            Self::FlacResample { sample_rate } => {
                let khz = f64::from(*sample_rate) / 1000.0;
                format!("FLAC 16-{}", khz)
            }
        }
    }

    /// Returns the extension forced onto converted audio files, if any.
    ///
    /// `None` keeps the source file's extension.
    pub fn output_extension(&self) -> Option<&'static str> {
        match self {
            Self::Vbr0 | Self::Cbr320 => Some("mp3"),
            Self::FlacResample { .. } => None,
        }
    }

    /// Whether this target goes through the flac | lame pipeline.
    pub fn is_mp3(&self) -> bool {
        matches!(self, Self::Vbr0 | Self::Cbr320)
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// The formats requested for a run, as selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatSelection {
    Vbr0,
    Cbr320,
    FlacResample,
    /// V0 and 320, plus a FLAC resample when a sample rate is given.
    #[default]
    All,
}

impl FormatSelection {
    /// Resolves the selection into concrete target formats.
    ///
    /// Returns `None` when a FLAC resample is explicitly requested without a
    /// usable sample rate.
    pub fn resolve(self, sample_rate: Option<u32>) -> Option<Vec<TargetFormat>> {
        let sample_rate = sample_rate.filter(|rate| *rate > 0);
        match self {
            Self::Vbr0 => Some(vec![TargetFormat::Vbr0]),
            Self::Cbr320 => Some(vec![TargetFormat::Cbr320]),
            Self::FlacResample => {
                sample_rate.map(|sample_rate| vec![TargetFormat::FlacResample { sample_rate }])
            }
            Self::All => {
                let mut formats = vec![TargetFormat::Vbr0, TargetFormat::Cbr320];
                if let Some(sample_rate) = sample_rate {
                    formats.push(TargetFormat::FlacResample { sample_rate });
                }
                Some(formats)
            }
        }
    }
}

/// One (input directory, target format) pair of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Absolute path of the source directory.
    pub input_directory: PathBuf,
    /// Version label derived from the target format.
    pub output_version_label: String,
    /// Target encoding.
    pub target_format: TargetFormat,
}

impl ConversionRequest {
    /// Creates a request for the given input and target.
    pub fn new(input_directory: impl Into<PathBuf>, target_format: TargetFormat) -> Self {
        Self {
            input_directory: input_directory.into(),
            output_version_label: target_format.label(),
            target_format,
        }
    }

    /// Sample rate for the FLAC resample target.
    pub fn sample_rate(&self) -> Option<u32> {
        match self.target_format {
            TargetFormat::FlacResample { sample_rate } => Some(sample_rate),
            _ => None,
        }
    }

    /// The sibling directory receiving the converted tree.
    ///
    /// Returns `None` when the input has no final path component.
    pub fn output_directory(&self) -> Option<PathBuf> {
        let name = self.input_directory.file_name()?.to_string_lossy();
        let output_name = create_output(&name, &self.output_version_label);
        Some(match self.input_directory.parent() {
            Some(parent) => parent.join(output_name),
            None => PathBuf::from(output_name),
        })
    }
}

/// Derives the output directory name from an input directory name.
///
/// Every `FLAC` token is replaced with the label. Names without the token get
/// the label appended in brackets.
pub fn create_output(name: &str, label: &str) -> String {
    if name.contains(SOURCE_TOKEN) {
        name.replace(SOURCE_TOKEN, label)
    } else {
        format!("{} [{}]", name, label)
    }
}

/// How the walker treats a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileClass {
    /// FLAC source, converted.
    Audio,
    /// Artwork, copied verbatim.
    Image,
    /// Anything else, skipped.
    Other,
}

/// Classifies a file by its extension, ignoring case.
pub fn classify(path: &Path) -> FileClass {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "flac" => FileClass::Audio,
        "jpg" | "jpeg" | "png" => FileClass::Image,
        _ => FileClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_output_replaces_token() {
        assert_eq!(
            create_output("Artist - Album [FLAC]", "V0 (VBR)"),
            "Artist - Album [V0 (VBR)]"
        );
        assert_eq!(create_output("Album FLAC 24-96", "320"), "Album 320 24-96");
    }

    #[test]
    fn test_create_output_appends_label() {
        let name = "Artist - Album (2004)";
        let output = create_output(name, "320");
        assert_eq!(output, "Artist - Album (2004) [320]");
        assert!(output.starts_with(name));
    }

    #[test]
    fn test_create_output_is_case_sensitive() {
        assert_eq!(create_output("album [flac]", "320"), "album [flac] [320]");
    }

    #[test]
    fn test_labels() {
        assert_eq!(TargetFormat::Vbr0.label(), "V0 (VBR)");
        assert_eq!(TargetFormat::Cbr320.label(), "320");
        assert_eq!(
            TargetFormat::FlacResample { sample_rate: 44100 }.label(),
            "FLAC 16-44.1"
        );
        assert_eq!(
            TargetFormat::FlacResample { sample_rate: 48000 }.label(),
            "FLAC 16-48"
        );
    }

    #[test]
    fn test_output_extension() {
        assert_eq!(TargetFormat::Vbr0.output_extension(), Some("mp3"));
        assert_eq!(TargetFormat::Cbr320.output_extension(), Some("mp3"));
        assert_eq!(
            TargetFormat::FlacResample { sample_rate: 44100 }.output_extension(),
            None
        );
    }

    #[test]
    fn test_resolve_selection() {
        assert_eq!(
            FormatSelection::All.resolve(None),
            Some(vec![TargetFormat::Vbr0, TargetFormat::Cbr320])
        );
        assert_eq!(
            FormatSelection::All.resolve(Some(48000)),
            Some(vec![
                TargetFormat::Vbr0,
                TargetFormat::Cbr320,
                TargetFormat::FlacResample { sample_rate: 48000 },
            ])
        );
        assert_eq!(
            FormatSelection::Cbr320.resolve(Some(48000)),
            Some(vec![TargetFormat::Cbr320])
        );
        assert_eq!(FormatSelection::FlacResample.resolve(None), None);
        assert_eq!(FormatSelection::FlacResample.resolve(Some(0)), None);
    }

    #[test]
    fn test_request_output_directory() {
        let request = ConversionRequest::new("/music/Artist - Album [FLAC]", TargetFormat::Vbr0);
        assert_eq!(request.output_version_label, "V0 (VBR)");
        assert_eq!(
            request.output_directory(),
            Some(PathBuf::from("/music/Artist - Album [V0 (VBR)]"))
        );
        assert_eq!(request.sample_rate(), None);
    }

    #[test]
    fn test_request_output_directory_without_name() {
        let request = ConversionRequest::new("/", TargetFormat::Cbr320);
        assert_eq!(request.output_directory(), None);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(Path::new("Cover.JPG")), FileClass::Image);
        assert_eq!(classify(Path::new("scan.jpeg")), FileClass::Image);
        assert_eq!(classify(Path::new("back.png")), FileClass::Image);
        assert_eq!(classify(Path::new("track.FLAC")), FileClass::Audio);
        assert_eq!(classify(Path::new("01.flac")), FileClass::Audio);
        assert_eq!(classify(Path::new("notes.txt")), FileClass::Other);
        assert_eq!(classify(Path::new("README")), FileClass::Other);
    }
}
