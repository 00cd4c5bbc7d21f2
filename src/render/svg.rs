//! SVG Venn diagram rendering.
//!
//! Circles have a fixed radius and a symmetric layout: side by side for two
//! sets, a triangle for three. Every region is annotated with its count.

use crate::venn::VennCounts;

const CANVAS_WIDTH: f64 = 600.0;
const TWO_SET_HEIGHT: f64 = 420.0;
const THREE_SET_HEIGHT: f64 = 560.0;
const TITLE_BAND: f64 = 30.0;
const RADIUS: f64 = 120.0;
/// Distance between circle centres.
const CENTER_SPACING: f64 = 140.0;
const LABEL_GAP: f64 = 28.0;

const SET_COLORS: [&str; 3] = ["#e41a1c", "#4daf4a", "#377eb8"];
const FILL_OPACITY: f64 = 0.4;

#[derive(Debug, Clone)]
pub struct VennDiagram {
    pub labels: Vec<String>,
    pub counts: VennCounts,
    pub title: Option<String>,
}

impl VennDiagram {
    pub fn new(labels: Vec<String>, counts: VennCounts, title: Option<String>) -> Self {
        Self { labels, counts, title }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

impl Point {
    fn offset_from(self, origin: Point, factor: f64) -> Point {
        Point { x: self.x + (self.x - origin.x) * factor, y: self.y + (self.y - origin.y) * factor }
    }
}

struct Layout {
    width: f64,
    height: f64,
    centers: Vec<Point>,
    centroid: Point,
}

impl Layout {
    fn for_sets(set_count: usize, has_title: bool) -> Self {
        let top = if has_title { TITLE_BAND } else { 0.0 };
        let width = CANVAS_WIDTH;
        let half = CENTER_SPACING / 2.0;

        let (height, centers) = if set_count == 3 {
            // Equilateral triangle centred on the canvas centre.
            let tri_height = CENTER_SPACING * 3f64.sqrt() / 2.0;
            let height = THREE_SET_HEIGHT + top;
            let cy = (THREE_SET_HEIGHT - 2.0 * LABEL_GAP) / 2.0 + top;
            let cx = width / 2.0;
            (
                height,
                vec![
                    Point { x: cx - half, y: cy - tri_height / 3.0 },
                    Point { x: cx + half, y: cy - tri_height / 3.0 },
                    Point { x: cx, y: cy + tri_height * 2.0 / 3.0 },
                ],
            )
        } else {
            let height = TWO_SET_HEIGHT + top;
            let cy = (TWO_SET_HEIGHT - LABEL_GAP) / 2.0 + top;
            let cx = width / 2.0;
            (height, vec![Point { x: cx - half, y: cy }, Point { x: cx + half, y: cy }])
        };

        let n = centers.len().max(1) as f64;
        let centroid = Point {
            x: centers.iter().map(|c| c.x).sum::<f64>() / n,
            y: centers.iter().map(|c| c.y).sum::<f64>() / n,
        };
        Self { width, height, centers, centroid }
    }

    /// Where to print the count of region `mask`.
    fn region_anchor(&self, mask: usize) -> Point {
        let members: Vec<Point> = self
            .centers
            .iter()
            .enumerate()
            .filter(|(idx, _)| mask & (1 << idx) != 0)
            .map(|(_, c)| *c)
            .collect();
        let n = members.len().max(1) as f64;
        let mean = Point {
            x: members.iter().map(|c| c.x).sum::<f64>() / n,
            y: members.iter().map(|c| c.y).sum::<f64>() / n,
        };
        let push = match (self.centers.len(), members.len()) {
            (2, 1) => 0.7,
            (3, 1) => 0.6,
            (3, 2) => 1.2,
            _ => 0.0,
        };
        mean.offset_from(self.centroid, push)
    }

    fn label_anchor(&self, index: usize) -> Point {
        let center = self.centers[index];
        if self.centers.len() == 2 {
            return Point { x: center.x, y: center.y + RADIUS + LABEL_GAP };
        }
        let dx = center.x - self.centroid.x;
        let dy = center.y - self.centroid.y;
        let distance = (dx * dx + dy * dy).sqrt().max(f64::EPSILON);
        let reach = distance + RADIUS + LABEL_GAP;
        Point {
            x: self.centroid.x + dx / distance * reach,
            y: self.centroid.y + dy / distance * reach,
        }
    }
}

/// Render the diagram as a standalone SVG document.
pub fn render_svg(diagram: &VennDiagram) -> String {
    let set_count = diagram.counts.set_count();
    let layout = Layout::for_sets(set_count, diagram.title.is_some());
    let (width, height) = (layout.width, layout.height);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\">"
    ));
    svg.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\" fill=\"#ffffff\"/>"
    ));

    if let Some(title) = &diagram.title {
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"24\" text-anchor=\"middle\" font-family=\"sans-serif\" \
             font-size=\"18\" font-weight=\"bold\">{}</text>",
            width / 2.0,
            xml_escape(title)
        ));
    }

    for (idx, center) in layout.centers.iter().enumerate() {
        let color = SET_COLORS[idx % SET_COLORS.len()];
        svg.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{RADIUS}\" fill=\"{color}\" \
             fill-opacity=\"{FILL_OPACITY}\" stroke=\"{color}\" stroke-width=\"2\"/>",
            center.x, center.y
        ));
    }

    for (mask, count) in diagram.counts.regions() {
        let anchor = layout.region_anchor(mask);
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" dominant-baseline=\"middle\" \
             font-family=\"sans-serif\" font-size=\"16\">{count}</text>",
            anchor.x, anchor.y
        ));
    }

    for idx in 0..layout.centers.len() {
        let anchor = layout.label_anchor(idx);
        let label = diagram.labels.get(idx).map(String::as_str).unwrap_or("");
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" dominant-baseline=\"middle\" \
             font-family=\"sans-serif\" font-size=\"18\" fill=\"{}\">{} ({})</text>",
            anchor.x,
            anchor.y,
            SET_COLORS[idx % SET_COLORS.len()],
            xml_escape(label),
            diagram.counts.set_size(idx)
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Cheap structural check used before rasterising.
pub fn looks_like_svg(svg: &str) -> bool {
    let trimmed = svg.trim();
    trimmed.starts_with("<svg") && trimmed.ends_with("</svg>") && trimmed.contains("<circle")
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn counts(sets: &[&[&str]]) -> VennCounts {
        let sets: Vec<BTreeSet<String>> =
            sets.iter().map(|s| s.iter().map(|i| i.to_string()).collect()).collect();
        VennCounts::from_sets(&sets)
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn two_set_svg_has_two_circles_and_three_counts() {
        let diagram = VennDiagram::new(
            labels(&["Left", "Right"]),
            counts(&[&["a", "b", "c"], &["c", "d"]]),
            None,
        );
        let svg = render_svg(&diagram);
        assert!(looks_like_svg(&svg));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(">Left (3)</text>"));
        assert!(svg.contains(">Right (2)</text>"));
        // 3 region counts + 2 labels
        assert_eq!(svg.matches("<text").count(), 5);
    }

    #[test]
    fn three_set_svg_has_seven_region_counts() {
        let diagram = VennDiagram::new(
            labels(&["A", "B", "C"]),
            counts(&[&["x"], &["x", "y"], &["x", "z"]]),
            Some("Overlap".to_string()),
        );
        let svg = render_svg(&diagram);
        assert_eq!(svg.matches("<circle").count(), 3);
        // title + 7 regions + 3 labels
        assert_eq!(svg.matches("<text").count(), 11);
        assert!(svg.contains(">Overlap</text>"));
    }

    #[test]
    fn labels_are_escaped() {
        let diagram = VennDiagram::new(
            labels(&["R&D", "<ops>"]),
            counts(&[&["a"], &["a"]]),
            Some("\"quoted\"".to_string()),
        );
        let svg = render_svg(&diagram);
        assert!(svg.contains("R&amp;D (1)"));
        assert!(svg.contains("&lt;ops&gt; (1)"));
        assert!(svg.contains("&quot;quoted&quot;"));
        assert!(!svg.contains("<ops>"));
    }

    #[test]
    fn region_anchors_stay_on_canvas() {
        for set_count in [2usize, 3] {
            let layout = Layout::for_sets(set_count, true);
            for mask in 1..(1usize << set_count) {
                let p = layout.region_anchor(mask);
                assert!(p.x > 0.0 && p.x < layout.width, "mask {mask} x={}", p.x);
                assert!(p.y > 0.0 && p.y < layout.height, "mask {mask} y={}", p.y);
            }
            for idx in 0..set_count {
                let p = layout.label_anchor(idx);
                assert!(p.x > 0.0 && p.x < layout.width);
                assert!(p.y > TITLE_BAND && p.y < layout.height);
            }
        }
    }

    #[test]
    fn shared_region_sits_at_centroid() {
        let layout = Layout::for_sets(3, false);
        let shared = layout.region_anchor(0b111);
        assert!((shared.x - layout.centroid.x).abs() < 1e-9);
        assert!((shared.y - layout.centroid.y).abs() < 1e-9);
    }
}
