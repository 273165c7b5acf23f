//! Weighted rarity draw behind the `屎王` trigger.

use rand::Rng;

/// One rarity tier: caption text plus the image pair sent with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RarityTier {
    pub name: &'static str,
    /// Draw probability. The table's weights sum to 1.0.
    pub weight: f64,
    pub caption: &'static str,
    pub image_url: &'static str,
    pub preview_url: &'static str,
}

/// Fixed five-tier table, most common first.
pub const DRAW_TABLE: [RarityTier; 5] = [
    RarityTier {
        name: "普通便便",
        weight: 0.40,
        caption: "💩 你抽到了普通便便！平平無奇的一坨。",
        image_url: "https://storage.googleapis.com/plop-bot-assets/draw/common.png",
        preview_url: "https://storage.googleapis.com/plop-bot-assets/draw/common_preview.png",
    },
    RarityTier {
        name: "金色便便",
        weight: 0.30,
        caption: "✨ 你抽到了金色便便！閃閃發光！",
        image_url: "https://storage.googleapis.com/plop-bot-assets/draw/gold.png",
        preview_url: "https://storage.googleapis.com/plop-bot-assets/draw/gold_preview.png",
    },
    RarityTier {
        name: "彩虹便便",
        weight: 0.15,
        caption: "🌈 你抽到了彩虹便便！七彩繽紛！",
        image_url: "https://storage.googleapis.com/plop-bot-assets/draw/rainbow.png",
        preview_url: "https://storage.googleapis.com/plop-bot-assets/draw/rainbow_preview.png",
    },
    RarityTier {
        name: "鑽石便便",
        weight: 0.10,
        caption: "💎 你抽到了鑽石便便！稀世珍寶！",
        image_url: "https://storage.googleapis.com/plop-bot-assets/draw/diamond.png",
        preview_url: "https://storage.googleapis.com/plop-bot-assets/draw/diamond_preview.png",
    },
    RarityTier {
        name: "傳說屎王",
        weight: 0.05,
        caption: "👑 傳說屎王降臨！萬中選一的究極大便！",
        image_url: "https://storage.googleapis.com/plop-bot-assets/draw/king.png",
        preview_url: "https://storage.googleapis.com/plop-bot-assets/draw/king_preview.png",
    },
];

/// Draws one tier. A single uniform sample walks the cumulative weights;
/// the last tier absorbs any floating-point residue.
pub fn draw_tier<R: Rng + ?Sized>(rng: &mut R) -> &'static RarityTier {
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for tier in &DRAW_TABLE {
        cumulative += tier.weight;
        if roll < cumulative {
            return tier;
        }
    }
    &DRAW_TABLE[DRAW_TABLE.len() - 1]
}
