use std::f64::consts::PI;
use std::fmt::Write;

use super::error::RenderError;
use super::frame::{Frame, FrameRenderer, FrameRequest};
use super::style::RenderStyle;
use crate::trajectory::GeoExtent;

/// Draws frames as standalone SVG documents on a plate carrée grid.
///
/// The satellite scene, when present, is attached as a tagged layer naming
/// its scan and input files; the track, position marker and timestamp are
/// drawn on top.
pub struct SvgRenderer {
    style: RenderStyle,
}

impl SvgRenderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }
}

/// Maps lon/lat onto pixel coordinates, y growing downwards.
struct Canvas {
    extent: GeoExtent,
    width: f64,
    height: f64,
}

impl Canvas {
    fn new(extent: GeoExtent, width: f64) -> Self {
        Self {
            extent,
            width,
            height: width * extent.height() / extent.width(),
        }
    }

    fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
        let x = (lon - self.extent.lon_min()) / self.extent.width() * self.width;
        let y = (self.extent.lat_max() - lat) / self.extent.height() * self.height;
        (x, y)
    }
}

impl FrameRenderer for SvgRenderer {
    fn extension(&self) -> &str {
        "svg"
    }

    fn render(&mut self, request: &FrameRequest<'_>) -> Result<Frame, RenderError> {
        let style = &self.style;
        let points = request.trajectory.points();
        let current = points
            .get(request.position)
            .ok_or(RenderError::NoPosition(request.position))?;

        let canvas = Canvas::new(*request.extent, style.width_in * style.dpi as f64);
        let (w, h) = (canvas.width, canvas.height);
        let mut out = String::new();

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.2} {h:.2}">"#
        )?;
        writeln!(
            out,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            escape(&style.background_color)
        )?;

        if let Some(scene) = request.scene {
            writeln!(
                out,
                r#"<g id="scene" data-sensor="{}" data-composite="{}" data-scan-start="{}">"#,
                scene.sensor,
                escape(&scene.composite),
                scene.window.start.to_rfc3339()
            )?;
            for file in &scene.files {
                writeln!(out, "<desc>{}</desc>", escape(&file.display().to_string()))?;
            }
            writeln!(out, "</g>")?;
        }

        writeln!(
            out,
            r#"<rect x="0" y="0" width="{w:.2}" height="{h:.2}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            escape(&style.border_color),
            style.line_width
        )?;

        if !style.single_point && request.position > 0 {
            writeln!(out, r#"<g id="track" stroke-linecap="round">"#)?;
            for pair in points[..=request.position].windows(2) {
                let (x1, y1) = canvas.project(pair[0].latitude, pair[0].longitude);
                let (x2, y2) = canvas.project(pair[1].latitude, pair[1].longitude);
                let alt = (pair[0].altitude + pair[1].altitude) / 2.0;
                writeln!(
                    out,
                    r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="{}"/>"#,
                    style.track_colormap.hex(style.altitude_fraction(alt)),
                    style.line_width
                )?;
            }
            writeln!(out, "</g>")?;
        }

        let (cx, cy) = canvas.project(current.latitude, current.longitude);
        writeln!(
            out,
            r#"<polygon id="position" points="{}" fill="{}"/>"#,
            star(cx, cy, style.dot_size * 2.0),
            escape(&style.position_color)
        )?;

        let (tx, ty) = style.text_position;
        writeln!(
            out,
            r#"<text x="{:.2}" y="{:.2}" font-size="{}" fill="{}">{}</text>"#,
            tx * w,
            (1.0 - ty) * h,
            style.text_size,
            escape(&style.text_color),
            request.timestamp.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(out, "</svg>")?;

        Ok(Frame::new(out.into_bytes()))
    }
}

/// Five-pointed star polygon centred on `(cx, cy)`.
fn star(cx: f64, cy: f64, radius: f64) -> String {
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { radius } else { radius * 0.4 };
            let a = -PI / 2.0 + i as f64 * PI / 5.0;
            format!("{:.2},{:.2}", cx + r * a.cos(), cy + r * a.sin())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::TimeDelta;

    use super::*;
    use crate::scan::{ScanWindow, Sensor};
    use crate::scene::Scene;
    use crate::test_util::{at, straight_track, test_extent};

    fn render(style: RenderStyle, position: usize, scene: Option<&Scene>) -> String {
        let trajectory = straight_track(6);
        let request = FrameRequest {
            extent: &test_extent(),
            trajectory: &trajectory,
            frame_index: position.saturating_sub(1),
            position,
            scene,
            timestamp: trajectory.points()[position].timestamp,
        };
        let frame = SvgRenderer::new(style).render(&request).unwrap();
        String::from_utf8(frame.bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_render_track_only() {
        let svg = render(RenderStyle::default(), 3, None);

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"width="900" height="450""#));
        assert_eq!(3, svg.matches("<line ").count());
        assert!(svg.contains(r#"<polygon id="position""#));
        assert!(svg.contains(">2019-05-26 12:01:30</text>"));
        assert!(!svg.contains(r#"id="scene""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_render_with_scene() {
        let scene = Scene {
            sensor: Sensor::Ahi,
            window: ScanWindow {
                start: at(12, 0, 0),
                duration: TimeDelta::minutes(10),
            },
            composite: "true_color".to_string(),
            extent: test_extent(),
            files: vec![PathBuf::from("/data/HS_H08_20190526_1200_B03_FLDK_R05_S0110.DAT")],
        };
        let svg = render(RenderStyle::default(), 2, Some(&scene));

        assert!(svg.contains(r#"data-sensor="AHI""#));
        assert!(svg.contains(r#"data-scan-start="2019-05-26T12:00:00+00:00""#));
        assert!(svg.contains("HS_H08_20190526_1200_B03_FLDK_R05_S0110.DAT"));
    }

    #[test]
    fn test_render_single_point() {
        let style = RenderStyle {
            single_point: true,
            ..Default::default()
        };
        let svg = render(style, 4, None);

        assert_eq!(0, svg.matches("<line ").count());
        assert!(svg.contains(r#"<polygon id="position""#));
    }

    #[test]
    fn test_render_position_out_of_range() {
        let trajectory = straight_track(3);
        let request = FrameRequest {
            extent: &test_extent(),
            trajectory: &trajectory,
            frame_index: 9,
            position: 10,
            scene: None,
            timestamp: at(12, 0, 0),
        };
        let r = SvgRenderer::new(RenderStyle::default()).render(&request);
        assert!(matches!(r, Err(RenderError::NoPosition(10))));
    }

    #[test]
    fn test_escape() {
        assert_eq!("a &amp; &lt;b&gt; &quot;c&quot;", escape(r#"a & <b> "c""#));
    }
}
