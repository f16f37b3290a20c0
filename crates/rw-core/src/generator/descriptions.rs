use crate::incident::{IncidentKind, Severity};

/// Fixed description catalog, three entries per `(kind, severity)` pair.
pub fn descriptions(kind: IncidentKind, severity: Severity) -> &'static [&'static str] {
    use IncidentKind::*;
    use Severity::*;

    match (kind, severity) {
        (Collision, High) => &[
            "Multi-vehicle collision with full closure",
            "Serious accident with casualties",
            "Pile-up involving more than 5 vehicles",
        ],
        (Collision, Medium) => &[
            "Collision between two vehicles",
            "Accident with cargo spill",
            "Rollover without serious injuries",
        ],
        (Collision, Low) => &[
            "Collision without injuries",
            "Vehicle with mechanical breakdown",
            "Incident without lane blockage",
        ],
        (Blockage, High) => &[
            "Full closure due to protest",
            "Complete closure due to landslide",
            "Closure due to serious accident",
        ],
        (Blockage, Medium) => &[
            "Partial closure for roadworks",
            "Lanes closed by fallen tree",
            "Temporary closure for rescue operation",
        ],
        (Blockage, Low) => &[
            "Shoulder closed",
            "Lane narrowing",
            "Rolling closure for maintenance",
        ],
        (Construction, High) => &[
            "Road widening works",
            "Bridge reconstruction",
            "Emergency slope containment works",
        ],
        (Construction, Medium) => &[
            "Pavement maintenance",
            "Drainage works",
            "Footbridge installation",
        ],
        (Construction, Low) => &[
            "Signage maintenance",
            "Vegetation trimming",
            "Lane repainting",
        ],
    }
}
