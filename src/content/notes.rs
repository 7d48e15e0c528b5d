//! Hand-written research notes.
//!
//! Notes are compiled in; there is no write path. Listing order is by date,
//! while the research view ranks by weight first.

use crate::models::Note;
use once_cell::sync::Lazy;

/// Weight at or above which a note is shown in the high-priority view.
pub const HIGH_WEIGHT: f64 = 0.8;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub static NOTES: Lazy<Vec<Note>> = Lazy::new(|| {
    vec![
        Note {
            slug: "event-continuity".to_string(),
            title: "事件連續性：題材如何開始自我增強".to_string(),
            date: "2026-02-04".to_string(),
            summary: "把同主題新聞拆成來源擴散、公司擴散與時間密度，建立可量化指標。".to_string(),
            tags: strings(&["EventRadar", "News", "Momentum"]),
            theme: Some("事件雷達".to_string()),
            sub_theme: Some("連續性".to_string()),
            weight: Some(0.8),
            body: strings(&[
                "核心想法：題材不是『出現一次』就有效，而是需要形成連續性與擴散性。",
                "可量化拆解：來源擴散、公司擴散、時間密度，三者同時上升時，題材會開始自我強化。",
                "交易角度：連續性往往對應『不相信的人』被迫修正預期，形成同時平倉推動。",
            ]),
        },
        Note {
            slug: "bbu-hvdc".to_string(),
            title: "BBU × HVDC：資料中心電力需求推導".to_string(),
            date: "2026-02-01".to_string(),
            summary: "從機櫃功耗與備援等級拆解電力架構：瓶頸、ASP、誰有定價權。".to_string(),
            tags: strings(&["Power", "DataCenter", "SupplyChain"]),
            theme: Some("AI 硬體供應鏈".to_string()),
            sub_theme: Some("Power".to_string()),
            weight: Some(0.75),
            body: strings(&[
                "核心想法：功耗上升時，系統會先在瓶頸段升級，該段通常也是 ASP 提升段。",
                "拆解方式：機櫃功耗 → 備援等級 → 電力轉換層級，逐層找出最吃材料與良率的環節。",
                "觀察重點：誰能提供整套方案、交期最緊、良率最難，就是定價權所在。",
            ]),
        },
    ]
});

/// Newest first.
pub fn sort_by_date(notes: &[Note]) -> Vec<Note> {
    let mut sorted = notes.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Weight descending (notes without a weight last), then newest first.
pub fn rank_notes(notes: &[Note]) -> Vec<Note> {
    let mut sorted = notes.to_vec();
    sorted.sort_by(|a, b| {
        let wa = a.weight.unwrap_or(f64::NEG_INFINITY);
        let wb = b.weight.unwrap_or(f64::NEG_INFINITY);
        wb.total_cmp(&wa).then_with(|| b.date.cmp(&a.date))
    });
    sorted
}

pub fn high_priority(notes: &[Note]) -> Vec<Note> {
    rank_notes(notes)
        .into_iter()
        .filter(|n| n.weight.unwrap_or(0.0) >= HIGH_WEIGHT)
        .collect()
}

pub fn all_notes() -> Vec<Note> {
    sort_by_date(&NOTES)
}

pub fn ranked_notes() -> Vec<Note> {
    rank_notes(&NOTES)
}

pub fn high_priority_notes() -> Vec<Note> {
    high_priority(&NOTES)
}

pub fn note_by_slug(slug: &str) -> Option<Note> {
    NOTES.iter().find(|n| n.slug == slug).cloned()
}
