//! [`Canvas`] on top of an egui [`Painter`](egui::Painter).

use std::sync::Arc;

use bevy_egui::egui;
use flamelens_core::{Canvas, Color, DevicePoint, DeviceRect, Font, FontStyle};

pub fn color32(c: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

fn font_id(font: &Font) -> egui::FontId {
    // egui's default fonts have no bold face; bold frames use the monospace family.
    match font.style {
        FontStyle::Bold => egui::FontId::monospace(font.size),
        FontStyle::Regular | FontStyle::Italic => egui::FontId::proportional(font.size),
    }
}

/// Draws in device pixels relative to `origin`, clipped by the painter.
pub struct EguiCanvas<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a egui::Painter, origin: egui::Pos2) -> Self {
        Self { painter, origin }
    }

    fn pos(&self, p: DevicePoint) -> egui::Pos2 {
        self.origin + egui::vec2(p.x as f32, p.y as f32)
    }

    fn rect(&self, r: DeviceRect) -> egui::Rect {
        egui::Rect::from_min_size(
            self.pos(DevicePoint::new(r.x, r.y)),
            egui::vec2(r.width as f32, r.height as f32),
        )
    }

    fn galley(&self, text: &str, font: &Font, color: egui::Color32) -> Arc<egui::Galley> {
        let format = egui::TextFormat {
            font_id: font_id(font),
            color,
            italics: font.style == FontStyle::Italic,
            ..Default::default()
        };
        let job = egui::text::LayoutJob::single_section(text.to_owned(), format);
        self.painter.layout_job(job)
    }
}

impl Canvas for EguiCanvas<'_> {
    fn fill_rect(&mut self, rect: DeviceRect, color: Color, corner_radius: f64) {
        self.painter.rect_filled(
            self.rect(rect),
            egui::Rounding::same(corner_radius as f32),
            color32(color),
        );
    }

    fn stroke_rect(&mut self, rect: DeviceRect, color: Color, width: f64) {
        self.painter.rect_stroke(
            self.rect(rect),
            egui::Rounding::ZERO,
            egui::Stroke::new(width as f32, color32(color)),
        );
    }

    fn text_width(&self, text: &str, font: &Font) -> f64 {
        self.galley(text, font, egui::Color32::WHITE).size().x as f64
    }

    fn line_height(&self, font: &Font) -> f64 {
        let id = font_id(font);
        self.painter.ctx().fonts(|f| f.row_height(&id)) as f64
    }

    fn draw_text(&mut self, text: &str, top_left: DevicePoint, font: &Font, color: Color) {
        let color = color32(color);
        let galley = self.galley(text, font, color);
        self.painter.galley(self.pos(top_left), galley, color);
    }
}
