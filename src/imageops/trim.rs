use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel, Rgb, Rgba};

/// Border trimming parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimOptions {
    /// Largest per-channel distance from `background` still counted as border.
    pub threshold: u8,
    pub background: Rgba<u8>,
}

impl Default for TrimOptions {
    /// Zero tolerance against fully transparent mid-grey.
    fn default() -> Self {
        Self {
            threshold: 0,
            background: Rgba([128, 128, 128, 0]),
        }
    }
}

/// Crops `image` to the bounding box of pixels that differ from the
/// background by more than the threshold.
///
/// Opaque images are compared on RGB alone. Images with an alpha channel are
/// compared on premultiplied colour plus alpha, so every fully transparent
/// pixel matches a fully transparent background whatever its stored colour.
/// An image that is entirely background is returned unchanged.
pub fn trim(image: DynamicImage, options: &TrimOptions) -> DynamicImage {
    let bounds = if image.color().has_alpha() {
        let background = premultiply(options.background);
        find_content_bounds(&image.to_rgba8(), options.threshold, |pixel| {
            channel_distance(&premultiply(*pixel).0, &background.0)
        })
    } else {
        let background = options.background.to_rgb();
        find_content_bounds(&image.to_rgb8(), options.threshold, |pixel| {
            channel_distance(&pixel.0, &background.0)
        })
    };

    match bounds {
        Some([x, y, width, height]) if (width, height) != image.dimensions() => {
            image.crop_imm(x, y, width, height)
        }
        _ => image,
    }
}

/// `[x, y, width, height]` of the content, or `None` if nothing stands out.
fn find_content_bounds<P, F>(
    buffer: &ImageBuffer<P, Vec<u8>>,
    threshold: u8,
    distance: F,
) -> Option<[u32; 4]>
where
    P: Pixel<Subpixel = u8>,
    F: Fn(&P) -> u8,
{
    let mut bounds: Option<[u32; 4]> = None; // [x1, y1, x2, y2]

    for (x, y, pixel) in buffer.enumerate_pixels() {
        if distance(pixel) > threshold {
            update_bounds(&mut bounds, x, y);
        }
    }

    bounds.map(|[x1, y1, x2, y2]| [x1, y1, x2 - x1 + 1, y2 - y1 + 1])
}

fn update_bounds(bounds: &mut Option<[u32; 4]>, x: u32, y: u32) {
    match bounds {
        Some(bounds) => {
            bounds[0] = bounds[0].min(x);
            bounds[1] = bounds[1].min(y);
            bounds[2] = bounds[2].max(x);
            bounds[3] = bounds[3].max(y);
        }
        None => *bounds = Some([x, y, x, y]),
    }
}

fn premultiply(pixel: Rgba<u8>) -> Rgba<u8> {
    let Rgba([r, g, b, a]) = pixel;
    let scale = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
    Rgba([scale(r), scale(g), scale(b), a])
}

fn channel_distance(pixel: &[u8], background: &[u8]) -> u8 {
    pixel
        .iter()
        .zip(background)
        .map(|(&p, &b)| p.abs_diff(b))
        .max()
        .unwrap_or(0)
}
