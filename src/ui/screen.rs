//! Frame execution on the 320x240 ILI9342C TFT.
//!
//! [`PanelScreen`] is a dumb executor: it walks the draw ops produced by
//! the render layer and turns each into embedded-graphics primitives.
//! Draw errors are swallowed; a glitched frame is corrected by the next
//! full redraw and there is nothing useful to do with the error here.

use core::fmt::Write as _;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text};
use heapless::String;

use crate::io::FrameRenderer;
use crate::view::{DrawOp, LinkBadge};

const WIDTH: i32 = 320;
const HEIGHT: i32 = 240;

pub struct PanelScreen<D> {
    target: D,
}

impl<D> PanelScreen<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    fn draw_op(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Clear => {
                let _ = self.target.clear(Rgb565::BLACK);
            }
            DrawOp::Title(title) => {
                let style = MonoTextStyle::new(&FONT_10X20, Rgb565::WHITE);
                let _ = Text::with_alignment(
                    title,
                    Point::new(WIDTH / 2, 28),
                    style,
                    Alignment::Center,
                )
                .draw(&mut self.target);
            }
            DrawOp::Badge(badge) => {
                let (color, label) = match badge {
                    LinkBadge::TransportDown => (Rgb565::RED, "no wifi"),
                    LinkBadge::SessionDown => (Rgb565::YELLOW, "no mqtt"),
                    LinkBadge::Connected => (Rgb565::GREEN, "online"),
                };
                let _ = Circle::new(Point::new(WIDTH - 30, 12), 16)
                    .into_styled(PrimitiveStyle::with_fill(color))
                    .draw(&mut self.target);
                let style = MonoTextStyle::new(&FONT_6X10, color);
                let _ = Text::with_alignment(
                    label,
                    Point::new(WIDTH - 38, 24),
                    style,
                    Alignment::Right,
                )
                .draw(&mut self.target);
            }
            DrawOp::NavHints => {
                let style = MonoTextStyle::new(&FONT_10X20, Rgb565::CYAN);
                let _ = Text::with_alignment("<", Point::new(45, 130), style, Alignment::Center)
                    .draw(&mut self.target);
                let _ = Text::with_alignment(
                    ">",
                    Point::new(WIDTH - 45, 130),
                    style,
                    Alignment::Center,
                )
                .draw(&mut self.target);
            }
            DrawOp::NumberPanel { value, active } => {
                let fill = if *active {
                    Rgb565::new(12, 24, 4)
                } else {
                    Rgb565::new(4, 8, 4)
                };
                let panel = Rectangle::new(Point::new(95, 75), Size::new(130, 100));
                let _ = panel
                    .into_styled(PrimitiveStyle::with_fill(fill))
                    .draw(&mut self.target);
                let text_color = if *active { Rgb565::YELLOW } else { Rgb565::WHITE };
                let mut digits: String<4> = String::new();
                let _ = write!(digits, "{:02}", value);
                let style = MonoTextStyle::new(&FONT_10X20, text_color);
                let _ = Text::with_alignment(
                    &digits,
                    Point::new(WIDTH / 2, 132),
                    style,
                    Alignment::Center,
                )
                .draw(&mut self.target);
            }
            DrawOp::KeyLegend => {
                // Labels sit above the three physical buttons below the glass.
                let style = MonoTextStyle::new(&FONT_6X10, Rgb565::CSS_GRAY);
                for (label, x) in [("-", 65), ("send", 160), ("+", 255)] {
                    let _ = Text::with_alignment(
                        label,
                        Point::new(x, HEIGHT - 8),
                        style,
                        Alignment::Center,
                    )
                    .draw(&mut self.target);
                }
            }
            DrawOp::TopicLine(topic) => {
                let style = MonoTextStyle::new(&FONT_6X10, Rgb565::CSS_DARK_GRAY);
                let _ = Text::with_alignment(
                    topic.as_str(),
                    Point::new(WIDTH / 2, 200),
                    style,
                    Alignment::Center,
                )
                .draw(&mut self.target);
            }
            DrawOp::BootProgress { attempt, limit } => {
                let mut line: String<32> = String::new();
                let _ = write!(line, "wifi: attempt {}/{}", attempt, limit);
                let style = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);
                let _ = Text::with_alignment(
                    &line,
                    Point::new(WIDTH / 2, 130),
                    style,
                    Alignment::Center,
                )
                .draw(&mut self.target);
            }
        }
    }
}

impl<D> FrameRenderer for PanelScreen<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn render(&mut self, ops: &[DrawOp]) {
        for op in ops {
            self.draw_op(op);
        }
    }
}
