use std::convert::Infallible;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};

pub const PANEL_TITLES: [&str; 4] = [
    "Original Image",
    "Grayscale Image",
    "Blurred Image",
    "Edge Detection",
];

pub const DEFAULT_PANEL_WIDTH: u32 = 480;

const MARGIN: u32 = 16;
const TITLE_BAND: u32 = 36;
const FIGURE_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Lets embedded-graphics text render straight into an `RgbImage`
struct LabelCanvas<'a>(&'a mut RgbImage);

impl OriginDimensions for LabelCanvas<'_> {
    fn size(&self) -> Size {
        Size::new(self.0.width(), self.0.height())
    }
}

impl DrawTarget for LabelCanvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = embedded_graphics::Pixel<Self::Color>>,
    {
        let (width, height) = self.0.dimensions();
        for embedded_graphics::Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x < width && y < height {
                self.0.put_pixel(x, y, Rgb([color.r(), color.g(), color.b()]));
            }
        }
        Ok(())
    }
}

/// Size of one panel once the source is scaled to `panel_width`
pub fn panel_size(source: (u32, u32), panel_width: u32) -> (u32, u32) {
    let (w, h) = source;
    let width = panel_width.max(1);
    let height = ((u64::from(h) * u64::from(width) + u64::from(w) / 2) / u64::from(w.max(1))).max(1);
    (width, height as u32)
}

/// Lay the four stages out side by side, each under its title.
///
/// All inputs must share the same dimensions.
pub fn compose(
    display: &RgbImage,
    luminance: &GrayImage,
    smoothed: &GrayImage,
    edges: &GrayImage,
    panel_width: u32,
) -> RgbImage {
    let (pw, ph) = panel_size(display.dimensions(), panel_width);
    let width = MARGIN + 4 * (pw + MARGIN);
    let height = MARGIN + TITLE_BAND + ph + MARGIN;
    let mut figure = RgbImage::from_pixel(width, height, FIGURE_BACKGROUND);

    let panels = [
        display.clone(),
        gray_to_rgb(luminance),
        gray_to_rgb(smoothed),
        gray_to_rgb(edges),
    ];

    for (i, (panel, title)) in panels.iter().zip(PANEL_TITLES).enumerate() {
        let x = MARGIN + i as u32 * (pw + MARGIN);
        let scaled = imageops::resize(panel, pw, ph, FilterType::Triangle);
        imageops::overlay(&mut figure, &scaled, i64::from(x), i64::from(MARGIN + TITLE_BAND));
        draw_title(&mut figure, title, x + pw / 2, MARGIN);
    }

    figure
}

fn gray_to_rgb(img: &GrayImage) -> RgbImage {
    DynamicImage::ImageLuma8(img.clone()).to_rgb8()
}

fn draw_title(figure: &mut RgbImage, title: &str, center_x: u32, top: u32) {
    let character_style = MonoTextStyle::new(&FONT_10X20, Rgb888::BLACK);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();
    let y = top + (TITLE_BAND - FONT_10X20.character_size.height) / 2;

    let mut canvas = LabelCanvas(figure);
    let Ok(_) = Text::with_text_style(
        title,
        Point::new(center_x as i32, y as i32),
        character_style,
        text_style,
    )
    .draw(&mut canvas);
}
