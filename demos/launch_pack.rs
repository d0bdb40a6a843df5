/// Launch Pack example: one seeded pack per content mode.
///
/// Five topics, one for each mode, rendered with a different style preset
/// and platform each, then a full Markdown document for the last one.
///
/// Run with: cargo run --example launch_pack

use glowmini::core::export;
use glowmini::core::pipeline::PackEngine;
use glowmini::schema::request::{Audience, GenerationRequest, Language, Platform};

fn main() {
    let engine = PackEngine::with_builtin_catalogs().expect("Failed to load built-in catalogs");

    let topics = [
        ("Tăng doanh thu cho shop online", Language::Vi, Platform::TikTok, "Clean Minimal"),
        ("Streamline the invoice workflow", Language::En, Platform::YouTubeShorts, "Tech Explainer"),
        ("Xây AI agent cho hệ thống nội bộ", Language::Vi, Platform::FacebookReels, "Cinematic 3D"),
        ("Học tiếng Anh mỗi ngày", Language::En, Platform::WebsiteBlog, "Handcrafted Cozy"),
        ("Một buổi sáng bình yên", Language::Vi, Platform::YouTubeShorts, "Watercolor Dream"),
    ];

    println!("========================================");
    println!("   GLOWMINI LAUNCH PACKS");
    println!("========================================");
    println!();

    let mut last = None;
    for (i, (topic, language, platform, style)) in topics.iter().enumerate() {
        let request = GenerationRequest::new(*topic)
            .language(*language)
            .platform(*platform)
            .duration_sec(30)
            .audience(Audience::General)
            .style_preset(*style)
            .seed(Some(2026));
        let pack = engine.generate(&request);

        println!("--- Pack {}: {} ---", i + 1, topic);
        println!("[{} | {} | {}]", pack.mode, platform.label(), style);
        println!();
        println!("{}", pack.outline);
        println!("{}", pack.shotlist);
        last = Some(pack);
    }

    if let Some(pack) = last {
        println!("========================================");
        println!("   EXPORT PREVIEW: {}", export::file_name(&pack));
        println!("========================================");
        println!();
        println!("{}", export::render(&pack).expect("Failed to render pack"));
    }
}
