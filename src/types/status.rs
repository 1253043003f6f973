//! Status definitions and their display table

use serde::{Deserialize, Serialize};

/// Every status the system can display or classify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    /// Baseline, nothing signalled
    Monitoring,
    /// Four fingers raised
    HelpCritical,
    /// Thumb + index
    Safe,
    /// Index + middle
    NeedAssistance,
    /// Open hand
    Stop,
    /// Head and hips at the same height
    Fallen,
    /// Hand seen but shape not in the table
    Undefined,
}

/// How a displayable status is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDisplay {
    /// RGB
    pub color: (u8, u8, u8),
    pub message: &'static str,
}

const DISPLAY_TABLE: [(StatusKind, StatusDisplay); 6] = [
    (StatusKind::HelpCritical, StatusDisplay { color: (255, 0, 0), message: "CRITICAL EMERGENCY" }),
    (StatusKind::Safe, StatusDisplay { color: (0, 255, 0), message: "PERSON SAFE" }),
    (StatusKind::NeedAssistance, StatusDisplay { color: (255, 255, 0), message: "NEEDS ASSISTANCE" }),
    (StatusKind::Stop, StatusDisplay { color: (255, 165, 0), message: "STOP COMMAND" }),
    (StatusKind::Fallen, StatusDisplay { color: (255, 0, 255), message: "POSSIBLE FALL" }),
    (StatusKind::Monitoring, StatusDisplay { color: (100, 100, 100), message: "SYSTEM ACTIVE" }),
];

impl StatusKind {
    pub const ALL: [StatusKind; 7] = [
        StatusKind::Monitoring,
        StatusKind::HelpCritical,
        StatusKind::Safe,
        StatusKind::NeedAssistance,
        StatusKind::Stop,
        StatusKind::Fallen,
        StatusKind::Undefined,
    ];

    /// Color and message, `None` for UNDEFINED
    pub fn display(&self) -> Option<StatusDisplay> {
        DISPLAY_TABLE
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, display)| *display)
    }

    /// Statuses a front-end should pulse or ring for
    pub fn is_critical(&self) -> bool {
        matches!(self, StatusKind::HelpCritical | StatusKind::Fallen)
    }

    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            StatusKind::Monitoring => "\x1b[90m",     // Gray
            StatusKind::HelpCritical => "\x1b[31m",   // Red
            StatusKind::Safe => "\x1b[32m",           // Green
            StatusKind::NeedAssistance => "\x1b[33m", // Yellow
            StatusKind::Stop => "\x1b[38;5;208m",     // Orange
            StatusKind::Fallen => "\x1b[35m",         // Magenta
            StatusKind::Undefined => "\x1b[37m",
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Get emoji for status
    pub fn emoji(&self) -> &'static str {
        match self {
            StatusKind::Monitoring => "👁",
            StatusKind::HelpCritical => "🆘",
            StatusKind::Safe => "✅",
            StatusKind::NeedAssistance => "✋",
            StatusKind::Stop => "🛑",
            StatusKind::Fallen => "🚨",
            StatusKind::Undefined => "❔",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StatusKind::Monitoring => "MONITORING",
            StatusKind::HelpCritical => "HELP_CRITICAL",
            StatusKind::Safe => "SAFE",
            StatusKind::NeedAssistance => "NEED_ASSISTANCE",
            StatusKind::Stop => "STOP",
            StatusKind::Fallen => "FALLEN",
            StatusKind::Undefined => "UNDEFINED",
        };
        write!(f, "{}", name)
    }
}
