use serde::{Deserialize, Serialize};

use crate::incident::IncidentKind;

pub const ICON_SIZE: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconGlyph {
    Triangle,
    Circle,
    Bar,
}

/// Type-specific marker icon description handed to [`MapBackend::create_icon`].
///
/// [`MapBackend::create_icon`]: super::MapBackend::create_icon
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconSpec {
    pub kind: IncidentKind,
    pub glyph: IconGlyph,
    /// CSS hex colour, e.g. `#ef4444`.
    pub color: &'static str,
    pub size: (u32, u32),
    pub anchor: (i32, i32),
    pub popup_anchor: (i32, i32),
}

impl IconSpec {
    pub fn for_kind(kind: IncidentKind) -> Self {
        let half = (ICON_SIZE / 2) as i32;
        Self {
            kind,
            glyph: glyph(kind),
            color: kind_color(kind),
            size: (ICON_SIZE, ICON_SIZE),
            anchor: (half, half),
            popup_anchor: (0, -half),
        }
    }

    /// Standalone SVG image for this icon.
    pub fn svg(&self) -> String {
        let shape = match self.glyph {
            IconGlyph::Triangle => r#"<path d="m21.73 18-8-14a2 2 0 0 0-3.48 0l-8 14A2 2 0 0 0 4 21h16a2 2 0 0 0 1.73-3Z"/>"#,
            IconGlyph::Circle => r#"<circle cx="12" cy="12" r="10"/>"#,
            IconGlyph::Bar => r#"<rect x="2" y="6" width="20" height="8" rx="1"/>"#,
        };
        let (w, h) = self.size;
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 24 24" fill="{c}" stroke="{c}" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">{shape}</svg>"#,
            c = self.color,
        )
    }
}

/// Display colour shared by icons and popup headings.
pub fn kind_color(kind: IncidentKind) -> &'static str {
    match kind {
        IncidentKind::Collision => "#ef4444",
        IncidentKind::Blockage => "#f97316",
        IncidentKind::Construction => "#eab308",
    }
}

fn glyph(kind: IncidentKind) -> IconGlyph {
    match kind {
        IncidentKind::Collision => IconGlyph::Triangle,
        IncidentKind::Blockage => IconGlyph::Circle,
        IncidentKind::Construction => IconGlyph::Bar,
    }
}
