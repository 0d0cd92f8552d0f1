//! Emoji catalog: the fixed name → platform emoji id table.
//!
//! Only these emojis can be attached to a message. Names are what the
//! planner and the fallback model see; ids are what the transport sends.
//! Catalog order is significant: it is the order shown to the model.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Platform emoji id understood by `SET_MSG_EMOJI_LIKE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmojiId(pub u32);

impl fmt::Display for EmojiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

const ENTRIES: &[(&str, EmojiId)] = &[
    ("大哭", EmojiId(5)),
    ("委屈", EmojiId(9)),
    ("骷髅头", EmojiId(37)),
    ("木槌敲头", EmojiId(38)),
    ("猪头", EmojiId(46)),
    ("抱抱", EmojiId(49)),
    ("便便", EmojiId(59)),
    ("玫瑰", EmojiId(63)),
    ("爱心", EmojiId(66)),
    ("点赞", EmojiId(76)),
    ("OK", EmojiId(124)),
    ("礼花", EmojiId(144)),
    ("爆筋", EmojiId(146)),
    ("棒棒糖", EmojiId(147)),
    ("药丸", EmojiId(168)),
    ("卖萌", EmojiId(175)),
    ("鬼魂", EmojiId(187)),
    ("托腮", EmojiId(212)),
    ("辣眼睛", EmojiId(265)),
    ("狗头", EmojiId(277)),
    ("摸鱼", EmojiId(285)),
    ("喵喵", EmojiId(307)),
    ("打call", EmojiId(311)),
    ("菜狗", EmojiId(317)),
    ("大怨种", EmojiId(344)),
    ("贴贴", EmojiId(350)),
    ("头秃", EmojiId(390)),
    ("狂按按钮", EmojiId(424)),
];

static BY_NAME: LazyLock<HashMap<&'static str, EmojiId>> =
    LazyLock::new(|| ENTRIES.iter().copied().collect());

/// Resolve a name to its id. Exact, case-sensitive match.
pub fn lookup(name: &str) -> Option<EmojiId> {
    BY_NAME.get(name).copied()
}

/// All entries in catalog order.
pub fn entries() -> &'static [(&'static str, EmojiId)] {
    ENTRIES
}

pub fn names() -> impl Iterator<Item = &'static str> {
    ENTRIES.iter().map(|(name, _)| *name)
}

/// JSON array of names in catalog order, non-ASCII left unescaped.
pub fn names_json() -> String {
    serde_json::Value::from(names().collect::<Vec<_>>()).to_string()
}

pub fn len() -> usize {
    ENTRIES.len()
}
