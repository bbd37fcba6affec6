// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people holding a camera over a sheet of
// paper.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity tells the host whether to re-prompt, ask for manual corners, or
// give up on the image.

use crate::error::PaperscanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Worth trying again as-is (worker hiccup, temporary I/O problem).
    Transient,
    /// User must do something (retake the photo, drag the corners).
    ActionRequired,
    /// Retrying the same input will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether repeating the same call may succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `PaperscanError` into a `HumanError` suitable for display.
pub fn humanize_error(err: &PaperscanError) -> HumanError {
    match err {
        // -- Detection --
        PaperscanError::NoContourFound => HumanError {
            message: "We couldn't find the edges of the page.".into(),
            suggestion: "Place the paper on a darker, plain surface and take the photo again, or mark the four corners yourself.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PaperscanError::DegenerateCorners { missing } => HumanError {
            message: "Part of the page is missing from the photo.".into(),
            suggestion: format!(
                "Make sure the whole page is visible, or move the corner markers by hand. ({} corner(s) not found)",
                missing.len()
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PaperscanError::SingularHomography | PaperscanError::DegenerateOutput { .. } => {
            HumanError {
                message: "Those corners don't outline a page.".into(),
                suggestion: "Drag the four corner markers onto the corners of the paper so they form a four-sided shape.".into(),
                retriable: false,
                severity: Severity::ActionRequired,
            }
        }

        // -- Pixel buffers --
        PaperscanError::UnsupportedChannelCount(_) | PaperscanError::BufferSizeMismatch { .. } => {
            HumanError {
                message: "The camera picture is in a format we can't read.".into(),
                suggestion: "Try taking the photo again, or load a JPEG or PNG file instead.".into(),
                retriable: false,
                severity: Severity::Permanent,
            }
        }

        PaperscanError::InvalidDimensions { .. } => HumanError {
            message: "The preview area has no size.".into(),
            suggestion: "Resize the window so the preview is visible, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PaperscanError::ImageError(_) | PaperscanError::InvalidDataUrl(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        PaperscanError::InvalidColor(detail) => HumanError {
            message: "That outline colour isn't recognised.".into(),
            suggestion: format!("Use a colour name such as \"orange\" or a hex value like \"#ff8800\". (Got: {detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Runtime / storage --
        PaperscanError::TaskFailed(_) => HumanError {
            message: "Loading the photo was interrupted.".into(),
            suggestion: "Try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        PaperscanError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or copy the file to a different location first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        PaperscanError::Serialization(_) => HumanError {
            message: "A settings or corners file couldn't be read.".into(),
            suggestion: "Check the file is valid JSON, or delete it to go back to the defaults.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}
