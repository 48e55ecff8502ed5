//! Closed output vocabularies for the classified columns.
//!
//! Every enum carries an `Na` variant for the "no rule matched" sentinel. Labels
//! are the exact strings written to the output table and accepted in rule files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

use crate::constants::NA;

/// A closed set of canonical labels with a sentinel member.
pub trait Vocabulary: Copy + Ord + Hash + fmt::Debug + fmt::Display + 'static {
    /// The "no rule matched" member
    const NA: Self;

    /// Every member, sentinel last
    const ALL: &'static [Self];

    /// Canonical output string
    fn label(&self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|member| member.label() == label)
    }

    fn is_na(&self) -> bool {
        *self == Self::NA
    }
}

macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
            #[serde(rename = "NA")]
            Na,
        }

        impl Vocabulary for $name {
            const NA: Self = $name::Na;
            const ALL: &'static [Self] = &[$($name::$variant,)+ $name::Na];

            fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Na => NA,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

vocabulary! {
    /// Canonical laptop colors
    Color {
        Black => "black",
        Silver => "silver",
        Grey => "grey",
        Blue => "blue",
        Red => "red",
        White => "white",
        Brown => "brown",
        Yellow => "yellow",
        Green => "green",
        Pink => "pink",
    }
}

vocabulary! {
    /// Canonical operating systems
    OperatingSystem {
        Windows11Pro => "windows 11 pro",
        Windows11Home => "windows 11 home",
        Windows11 => "windows 11",
        Windows10Pro => "windows 10 pro",
        Windows10Home => "windows 10 home",
        Windows10 => "windows 10",
        Windows7 => "windows 7",
        Windows => "windows",
        MacOs => "macos",
        ChromeOs => "chromeos",
        Linux => "linux",
        Android => "android",
    }
}

vocabulary! {
    /// Canonical special-feature tags
    Feature {
        BacklitKeyboard => "backlit keyboard",
        FingerprintReader => "fingerprint reader",
        HdAudio => "hd audio",
        AntiGlare => "anti-glare",
        Touchscreen => "touchscreen",
        Lightweight => "lightweight",
        WaterResistant => "water resistant",
        NumericKeypad => "numeric keypad",
        Stylus => "stylus",
        PrivacyShutter => "privacy shutter",
        NarrowBezel => "narrow bezel",
        VoiceAssistant => "voice assistant",
        MemoryCardSlot => "memory card slot",
        ChicletKeyboard => "chiclet keyboard",
        Wifi6 => "wifi 6",
        Rugged => "rugged",
    }
}

vocabulary! {
    /// Coarse graphics class
    GraphicsClass {
        Integrated => "integrated",
        Dedicated => "dedicated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_from_label() {
        for color in Color::ALL {
            assert_eq!(Color::from_label(color.label()), Some(*color));
        }
        assert_eq!(OperatingSystem::from_label("windows 10 pro"), Some(OperatingSystem::Windows10Pro));
        assert_eq!(Feature::from_label("wifi 6"), Some(Feature::Wifi6));
        assert_eq!(GraphicsClass::from_label("teal"), None);
    }

    #[test]
    fn test_sentinel_is_last_and_displays_as_na() {
        assert_eq!(Color::ALL.last(), Some(&Color::Na));
        assert_eq!(GraphicsClass::Na.to_string(), "NA");
        assert!(Feature::Na.is_na());
        assert!(!Feature::Stylus.is_na());
    }

    #[test]
    fn test_serde_uses_output_labels() {
        let json = serde_json::to_string(&OperatingSystem::ChromeOs).unwrap();
        assert_eq!(json, "\"chromeos\"");

        let parsed: Feature = serde_json::from_str("\"anti-glare\"").unwrap();
        assert_eq!(parsed, Feature::AntiGlare);
    }
}
