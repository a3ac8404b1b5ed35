//! The fixed set of settings DeviceParts knows about.

use crate::broadcast::StickyBroadcast;
use std::fmt;
use std::path::Path;

pub const INCALL_EARPIECE: &str = "incall_earpiece";
pub const INCALL_HEADPHONE: &str = "incall_headphone";
pub const INCALL_SPEAKER: &str = "incall_speaker";
pub const INCALL_BT: &str = "incall_bt";
pub const AUDIOOUT_HEADPHONE: &str = "audioout_headphone";
pub const AUDIOOUT_SPEAKER: &str = "audioout_speaker";
pub const BL_AUTO_BRIGHTNESS: &str = "bl_auto_brightness";
pub const DOCK_AUDIO: &str = "dock_audio";

pub const DOCK_ACTION: &str = "com.cyanogenmod.settings.SamsungDock";
pub const DOCK_EXTRA: &str = "data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingGroup {
    InCallAudio,
    OutputAudio,
    Display,
    Dock,
}

impl SettingGroup {
    pub const ALL: [SettingGroup; 4] = [
        SettingGroup::InCallAudio,
        SettingGroup::OutputAudio,
        SettingGroup::Display,
        SettingGroup::Dock,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingGroup::InCallAudio => "incall",
            SettingGroup::OutputAudio => "output",
            SettingGroup::Display => "display",
            SettingGroup::Dock => "dock",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.as_str() == name)
    }
}

impl fmt::Display for SettingGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a boolean onto the text token a target understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenEncoding {
    pub on: &'static str,
    pub off: &'static str,
}

impl TokenEncoding {
    pub const NUMERIC: TokenEncoding = TokenEncoding { on: "1", off: "0" };
    pub const ON_OFF: TokenEncoding = TokenEncoding { on: "on", off: "off" };

    pub fn encode(&self, value: bool) -> &'static str {
        if value {
            self.on
        } else {
            self.off
        }
    }

    pub fn decode(&self, token: &str) -> Option<bool> {
        match token.trim() {
            t if t == self.on => Some(true),
            t if t == self.off => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingTarget {
    /// A kernel control node, written with the encoded token.
    DeviceFile { path: &'static str },
    /// A sticky broadcast carrying the encoded token in `extra`.
    Broadcast { action: &'static str, extra: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingDescriptor {
    pub key: &'static str,
    pub group: SettingGroup,
    /// Hardware sub-target the capability probe looks for.
    pub sub_target: &'static str,
    pub target: SettingTarget,
    pub encoding: TokenEncoding,
    pub summary: &'static str,
}

impl SettingDescriptor {
    pub fn device_path(&self) -> Option<&'static Path> {
        match self.target {
            SettingTarget::DeviceFile { path } => Some(Path::new(path)),
            SettingTarget::Broadcast { .. } => None,
        }
    }

    pub fn is_broadcast(&self) -> bool {
        matches!(self.target, SettingTarget::Broadcast { .. })
    }

    /// The sticky broadcast announcing `value`, built from this setting's
    /// action, extra and encoding. `None` for device-file settings.
    pub fn broadcast(&self, value: bool) -> Option<StickyBroadcast> {
        match self.target {
            SettingTarget::Broadcast { action, extra } => {
                Some(StickyBroadcast::to_all_users(action).with_extra(extra, self.encoding.encode(value)))
            }
            SettingTarget::DeviceFile { .. } => None,
        }
    }
}

const fn incall(key: &'static str, sub_target: &'static str, path: &'static str, summary: &'static str) -> SettingDescriptor {
    SettingDescriptor {
        key,
        group: SettingGroup::InCallAudio,
        sub_target,
        target: SettingTarget::DeviceFile { path },
        encoding: TokenEncoding::NUMERIC,
        summary,
    }
}

const fn output(key: &'static str, sub_target: &'static str, path: &'static str, summary: &'static str) -> SettingDescriptor {
    SettingDescriptor {
        key,
        group: SettingGroup::OutputAudio,
        sub_target,
        target: SettingTarget::DeviceFile { path },
        encoding: TokenEncoding::ON_OFF,
        summary,
    }
}

pub const DOCK_AUDIO_SETTING: SettingDescriptor = SettingDescriptor {
    key: DOCK_AUDIO,
    group: SettingGroup::Dock,
    sub_target: "dock",
    target: SettingTarget::Broadcast {
        action: DOCK_ACTION,
        extra: DOCK_EXTRA,
    },
    encoding: TokenEncoding::NUMERIC,
    summary: "Route audio to the dock",
};

pub static CATALOG: [SettingDescriptor; 8] = [
    incall(INCALL_EARPIECE, "earpiece", "/sys/class/samsung_audio/incall/earpiece", "In-call earpiece tuning"),
    incall(INCALL_HEADPHONE, "headphone", "/sys/class/samsung_audio/incall/headphone", "In-call headphone tuning"),
    incall(INCALL_SPEAKER, "speaker", "/sys/class/samsung_audio/incall/speaker", "In-call speaker tuning"),
    incall(INCALL_BT, "bt", "/sys/class/samsung_audio/incall/bt", "In-call Bluetooth tuning"),
    output(AUDIOOUT_HEADPHONE, "headphone", "/sys/class/samsung_audio/output/headphone", "Headphone output tuning"),
    output(AUDIOOUT_SPEAKER, "speaker", "/sys/class/samsung_audio/output/speaker", "Speaker output tuning"),
    SettingDescriptor {
        key: BL_AUTO_BRIGHTNESS,
        group: SettingGroup::Display,
        sub_target: "auto_brightness",
        target: SettingTarget::DeviceFile {
            path: "/sys/class/backlight/panel/auto_brightness",
        },
        // "1" is the panel's AUTO_INDOOR1 mode, "0" is MANUAL.
        encoding: TokenEncoding::NUMERIC,
        summary: "Backlight auto-brightness",
    },
    DOCK_AUDIO_SETTING,
];

pub fn find(key: &str) -> Option<&'static SettingDescriptor> {
    CATALOG.iter().find(|descriptor| descriptor.key == key)
}

pub fn in_group(group: SettingGroup) -> impl Iterator<Item = &'static SettingDescriptor> {
    CATALOG.iter().filter(move |descriptor| descriptor.group == group)
}
