use std::fmt::Write as _;

use super::icon::kind_color;
use crate::incident::Incident;

/// Escape text for inclusion in HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Popup body bound to an incident's marker.
pub fn render_popup(incident: &Incident) -> String {
    let mut html = String::from(r#"<div class="incident-popup">"#);
    let _ = write!(
        html,
        r#"<h3 style="color: {}">{}</h3>"#,
        kind_color(incident.kind),
        incident.kind,
    );
    let coords = format!(
        "{:.4}, {:.4}",
        incident.coordinates.lat, incident.coordinates.lng
    );
    for (label, value) in [
        ("Region", incident.region_name.as_str()),
        ("Route", incident.route.code.as_str()),
        ("Location", incident.location_label.as_str()),
        ("Coordinates", coords.as_str()),
        ("Description", incident.description.as_str()),
        ("Date", incident.display_date.as_str()),
    ] {
        let _ = write!(
            html,
            "<p><strong>{label}:</strong> {}</p>",
            escape_html(value)
        );
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Route;
    use crate::geo::GeoPoint;
    use crate::incident::{IncidentId, IncidentKind};

    fn sample() -> Incident {
        Incident {
            id: IncidentId::new("inc-1"),
            kind: IncidentKind::Collision,
            route: Route {
                code: "BR-116".into(),
                display_name: "Rodovia Régis Bittencourt".into(),
            },
            location_label: "São Paulo - Rodovia Régis Bittencourt".into(),
            description: "[High] Truck & car <collision>".into(),
            coordinates: GeoPoint::new(-23.550512, -46.633309),
            region_name: "São Paulo".into(),
            created_at: "2026-03-10T11:00:00Z".parse().unwrap(),
            display_date: "10/03/2026, 08:00".into(),
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn popup_lists_fields() {
        let html = render_popup(&sample());
        assert!(html.contains(r##"<h3 style="color: #ef4444">Collision</h3>"##));
        assert!(html.contains("<strong>Region:</strong> São Paulo"));
        assert!(html.contains("<strong>Route:</strong> BR-116"));
        assert!(html.contains("<strong>Coordinates:</strong> -23.5505, -46.6333"));
        assert!(html.contains("<strong>Date:</strong> 10/03/2026, 08:00"));
        assert!(html.contains("Truck &amp; car &lt;collision&gt;"));
        assert!(!html.contains("<collision>"));
    }
}
