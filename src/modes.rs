//! Static description of the three stuck-point modes.
//!
//! Each mode owns an ordered list of input fields and an ordered list of
//! action buttons. Nothing here is mutated after startup.

/// One of the three stages a writer can be stuck at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeId {
    Start,
    Push,
    Restart,
}

impl ModeId {
    /// All modes in stage-gate order.
    pub const ALL: [ModeId; 3] = [ModeId::Start, ModeId::Push, ModeId::Restart];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Push => "push",
            Self::Restart => "restart",
        }
    }
}

/// Identifier of a result button. Each action belongs to exactly one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    ThreeWays,
    Hook,
    FirstDrop,
    NextFive,
    UpgradeConflict,
    EasyPath,
    Amplify,
    Hardcore,
    EmotionSlice,
}

impl ActionId {
    #[cfg(test)]
    pub const ALL: [ActionId; 9] = [
        ActionId::ThreeWays,
        ActionId::Hook,
        ActionId::FirstDrop,
        ActionId::NextFive,
        ActionId::UpgradeConflict,
        ActionId::EasyPath,
        ActionId::Amplify,
        ActionId::Hardcore,
        ActionId::EmotionSlice,
    ];

    /// String identifier used in logs.
    pub fn tag(self) -> &'static str {
        match self {
            Self::ThreeWays => "threeWays",
            Self::Hook => "hook",
            Self::FirstDrop => "firstDrop",
            Self::NextFive => "nextFive",
            Self::UpgradeConflict => "upgradeConflict",
            Self::EasyPath => "easyPath",
            Self::Amplify => "amplify",
            Self::Hardcore => "hardcore",
            Self::EmotionSlice => "emotionSlice",
        }
    }

    /// Parse a string identifier back into an action.
    #[cfg(test)]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.tag() == tag)
    }

    /// The mode whose generation process this action flavors.
    pub fn mode(self) -> ModeId {
        match self {
            Self::ThreeWays | Self::Hook | Self::FirstDrop => ModeId::Start,
            Self::NextFive | Self::UpgradeConflict | Self::EasyPath => ModeId::Push,
            Self::Amplify | Self::Hardcore | Self::EmotionSlice => ModeId::Restart,
        }
    }
}

/// Widget kind of an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Multi-line text; Enter inserts a newline.
    MultiLine,
    /// Single choice from a fixed option list.
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ActionSpec {
    pub text: &'static str,
    pub action: ActionId,
}

#[derive(Debug)]
pub struct ModeConfig {
    pub title: &'static str,
    pub note: &'static str,
    pub fields: &'static [FieldSpec],
    pub actions: &'static [ActionSpec],
}

/// Options for the push-mode block type selector, in display order.
pub const BLOCK_TYPES: &[&str] = &["推进", "冲突", "动机", "节奏", "对话"];

const fn text(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Text,
        required: false,
    }
}

const fn multi_line(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::MultiLine,
        required: false,
    }
}

static START: ModeConfig = ModeConfig {
    title: "🌸 起步模式",
    note: "从一个小种子出发，把故事的第一口呼吸写出来。",
    fields: &[
        FieldSpec {
            key: "seed",
            label: "故事种子（必填）",
            kind: FieldKind::MultiLine,
            required: true,
        },
        text("lead", "主角一句话"),
        text("mood", "想要的情绪"),
        text("avoid", "不想写什么"),
    ],
    actions: &[
        ActionSpec {
            text: "✨ 给我三个故事方向",
            action: ActionId::ThreeWays,
        },
        ActionSpec {
            text: "✨ 给我开场钩子",
            action: ActionId::Hook,
        },
        ActionSpec {
            text: "✨ 给我第一段落笔提示",
            action: ActionId::FirstDrop,
        },
    ],
};

static PUSH: ModeConfig = ModeConfig {
    title: "🌷 推进模式",
    note: "故事已经在路上，只差一个转弯继续往前走。",
    fields: &[
        text("progress", "当前进度"),
        multi_line("recent", "最近发生了什么"),
        text("goal", "我接下来想达到什么"),
        FieldSpec {
            key: "blockType",
            label: "卡点类型",
            kind: FieldKind::Choice(BLOCK_TYPES),
            required: false,
        },
    ],
    actions: &[
        ActionSpec {
            text: "⚡ 下一幕5个走向",
            action: ActionId::NextFive,
        },
        ActionSpec {
            text: "⚡ 冲突升级",
            action: ActionId::UpgradeConflict,
        },
        ActionSpec {
            text: "⚡ 推荐最省力写法",
            action: ActionId::EasyPath,
        },
    ],
};

static RESTART: ModeConfig = ModeConfig {
    title: "🌙 重启模式",
    note: "灵感电量不足时，让核心矛盾重新亮起来。",
    fields: &[
        multi_line("oneLine", "这本小说如果只剩一句话，它讲什么？"),
        multi_line("scene", "你最舍不得删掉哪个场景？"),
        multi_line("worst", "如果主角失败，最糟会发生什么？"),
    ],
    actions: &[
        ActionSpec {
            text: "🌊 放大冲突",
            action: ActionId::Amplify,
        },
        ActionSpec {
            text: "🌊 给我更狠版本",
            action: ActionId::Hardcore,
        },
        ActionSpec {
            text: "🌊 给我情绪片段写法",
            action: ActionId::EmotionSlice,
        },
    ],
};

/// Look up the static configuration for a mode.
pub fn mode_config(mode: ModeId) -> &'static ModeConfig {
    match mode {
        ModeId::Start => &START,
        ModeId::Push => &PUSH,
        ModeId::Restart => &RESTART,
    }
}
