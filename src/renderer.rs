//! Canvas2D rendering
//!
//! Draws a `FrameView`. Purely decorative: nothing here feeds back into the sim.

use std::f64::consts::{PI, TAU};

use web_sys::CanvasRenderingContext2d;

use crate::settings::Settings;
use crate::sim::{DropView, FrameView, Rect};

const CLOUD_DRIFT_PER_MS: f64 = 0.006;

/// Colors for one palette
struct Palette {
    sky: &'static str,
    hills: &'static str,
    clouds: &'static str,
    drop: &'static str,
    drop_highlight: &'static str,
    tank: &'static str,
    skin: &'static str,
    hat: &'static str,
    body: &'static str,
    bucket: &'static str,
    bucket_rim: &'static str,
    water: &'static str,
}

const NORMAL: Palette = Palette {
    sky: "#888a8c",
    hills: "#43a047",
    clouds: "#cfd8dc",
    drop: "#00b0ff",
    drop_highlight: "#b3e5fc",
    tank: "#2962ff",
    skin: "#ffcc99",
    hat: "#00e5ff",
    body: "#cc3344",
    bucket: "#00b0ff",
    bucket_rim: "#004a63",
    water: "#00e5ff",
};

const HIGH_CONTRAST: Palette = Palette {
    sky: "#000000",
    hills: "#1b5e20",
    clouds: "#555555",
    drop: "#40c4ff",
    drop_highlight: "#ffffff",
    tank: "#ffeb3b",
    skin: "#ffffff",
    hat: "#ffeb3b",
    body: "#ff1744",
    bucket: "#40c4ff",
    bucket_rim: "#ffffff",
    water: "#ffffff",
};

/// Draws frames onto a 2D canvas context
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    palette: &'static Palette,
    reduced_motion: bool,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d, settings: &Settings) -> Self {
        Self {
            ctx,
            palette: if settings.high_contrast {
                &HIGH_CONTRAST
            } else {
                &NORMAL
            },
            reduced_motion: settings.reduced_motion,
        }
    }

    /// Render the current frame. `time` is the rAF timestamp in ms.
    pub fn draw(&self, view: &FrameView, time: f64) {
        let width = view.board.x as f64;
        self.draw_background(width, view.board.y as f64);
        let drift = if self.reduced_motion {
            0.0
        } else {
            (time * CLOUD_DRIFT_PER_MS) % width
        };
        self.draw_clouds(drift, width);
        for drop in &view.drops {
            self.draw_drop(drop);
        }
        for tank in &view.tanks {
            self.draw_tank(tank);
        }
        self.draw_player(&view.player, view.bucket_fill as f64);
    }

    fn draw_background(&self, width: f64, height: f64) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(self.palette.sky);
        ctx.fill_rect(0.0, 0.0, width, height);

        ctx.begin_path();
        let _ = ctx.arc(width * 0.2, height - 40.0, 110.0, PI, TAU);
        let _ = ctx.arc(width * 0.45, height - 20.0, 150.0, PI, TAU);
        let _ = ctx.arc(width * 0.75, height - 50.0, 100.0, PI, TAU);
        ctx.set_fill_style_str(self.palette.hills);
        ctx.fill();
    }

    fn draw_clouds(&self, drift: f64, width: f64) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(self.palette.clouds);
        for (x, y, rx, ry) in [
            (250.0, 50.0, 40.0, 18.0),
            (270.0, 55.0, 30.0, 14.0),
            (230.0, 60.0, 25.0, 10.0),
            (560.0, 80.0, 45.0, 20.0),
            (585.0, 72.0, 30.0, 14.0),
        ] {
            let x = (x + drift) % width;
            ctx.begin_path();
            let _ = ctx.ellipse(x, y, rx, ry, 0.0, 0.0, TAU);
            ctx.fill();
        }
    }

    fn draw_drop(&self, drop: &DropView) {
        let ctx = &self.ctx;
        let (x, y, r) = (drop.pos.x as f64, drop.pos.y as f64, drop.radius as f64);

        ctx.begin_path();
        let _ = ctx.ellipse(x, y, r, r * 1.8, 0.0, 0.0, TAU);
        ctx.set_fill_style_str(self.palette.drop);
        ctx.set_global_alpha(0.85);
        ctx.fill();

        ctx.begin_path();
        let _ = ctx.ellipse(x - r / 3.0, y - r / 2.0, r / 3.0, r / 2.2, 0.0, 0.0, TAU);
        ctx.set_fill_style_str(self.palette.drop_highlight);
        ctx.set_global_alpha(0.7);
        ctx.fill();
        ctx.set_global_alpha(1.0);
    }

    fn draw_tank(&self, tank: &Rect) {
        self.ctx.set_fill_style_str(self.palette.tank);
        self.ctx.fill_rect(
            tank.pos.x as f64,
            tank.pos.y as f64,
            tank.width as f64,
            tank.height as f64,
        );
    }

    /// Stick figure holding a barrel bucket
    fn draw_player(&self, player: &Rect, fill: f64) {
        let ctx = &self.ctx;
        let (x, y, w) = (player.pos.x as f64, player.pos.y as f64, player.width as f64);
        let center = x + w / 2.0;
        let head = 10.0;
        let body_top = y + head * 2.0;
        let body_len = 24.0;
        let limb = 18.0;

        // head and hat
        ctx.begin_path();
        let _ = ctx.arc(center, y + head, head, 0.0, TAU);
        ctx.set_fill_style_str(self.palette.skin);
        ctx.fill();
        ctx.set_fill_style_str(self.palette.hat);
        ctx.fill_rect(center - head + 2.0, y + 2.0, head * 1.6, 8.0);
        ctx.fill_rect(center - head - 2.0, y + 9.0, head * 2.0, 4.0);

        // torso, arms, legs
        ctx.begin_path();
        ctx.move_to(center, body_top);
        ctx.line_to(center, body_top + body_len);
        ctx.move_to(center, body_top + 6.0);
        ctx.line_to(center - limb, body_top + 18.0);
        ctx.move_to(center, body_top + 6.0);
        ctx.line_to(center + limb, body_top + 18.0);
        ctx.move_to(center, body_top + body_len);
        ctx.line_to(center - 10.0, body_top + body_len + limb);
        ctx.move_to(center, body_top + body_len);
        ctx.line_to(center + 10.0, body_top + body_len + limb);
        ctx.set_stroke_style_str(self.palette.body);
        ctx.set_line_width(4.0);
        ctx.stroke();

        // bucket
        let bucket_w = w + 22.0;
        let bucket_h = 32.0;
        let bucket_y = body_top + 10.0;
        ctx.begin_path();
        let _ = ctx.ellipse(
            center,
            bucket_y + bucket_h / 2.0,
            bucket_w / 2.0,
            bucket_h / 2.0,
            0.0,
            0.0,
            TAU,
        );
        ctx.set_fill_style_str(self.palette.bucket);
        ctx.fill();
        ctx.set_stroke_style_str(self.palette.bucket_rim);
        ctx.set_line_width(3.0);
        ctx.stroke();

        // water level
        if fill > 0.0 {
            let level = (bucket_h - 8.0) * fill.min(1.0);
            ctx.begin_path();
            let _ = ctx.ellipse(
                center,
                bucket_y + bucket_h - level / 2.0,
                bucket_w / 2.0 - 4.0,
                level / 2.0,
                0.0,
                0.0,
                TAU,
            );
            ctx.set_fill_style_str(self.palette.water);
            ctx.set_global_alpha(0.8);
            ctx.fill();
            ctx.set_global_alpha(1.0);
        }
    }
}
