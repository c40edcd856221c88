use iced::widget::image::Handle;
use iced::widget::{Image, center};
use iced::{ContentFit, Element, Size, Task};
use image::{DynamicImage, RgbImage};

const WINDOW_TITLE: &str = "Edge Detection Results";

struct ResultViewer {
    handle: Handle,
}

#[derive(Debug, Clone)]
enum Message {}

impl ResultViewer {
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {}
    }

    fn view(&self) -> Element<'_, Message> {
        center(Image::<Handle>::new(self.handle.clone()).content_fit(ContentFit::Contain))
            .padding(10)
            .into()
    }
}

/// Show the composite in a window, blocking until it is closed
pub fn show(composite: &RgbImage) -> iced::Result {
    let (width, height) = composite.dimensions();
    let rgba = DynamicImage::ImageRgb8(composite.clone()).into_rgba8();
    let handle = Handle::from_rgba(width, height, rgba.into_raw());

    iced::application(
        move || ResultViewer {
            handle: handle.clone(),
        },
        ResultViewer::update,
        ResultViewer::view,
    )
    .title(WINDOW_TITLE)
    .window_size(Size::new(
        (width as f32 + 20.0).min(1600.0),
        (height as f32 + 20.0).min(900.0),
    ))
    .run()
}
