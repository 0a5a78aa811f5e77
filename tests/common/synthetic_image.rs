use vehicle_detector::image::RgbImageU8;
use vehicle_detector::BoundingBox;

/// Black frame with one solid filled rectangle.
pub fn rectangle_frame(width: usize, height: usize, rect: BoundingBox, color: [u8; 3]) -> RgbImageU8 {
    assert!(width > 0 && height > 0, "frame dimensions must be positive");
    assert!(
        rect.x1 <= width && rect.y1 <= height,
        "rectangle must lie inside the frame"
    );
    let mut img = RgbImageU8::new(width, height);
    for y in rect.y0..rect.y1 {
        for x in rect.x0..rect.x1 {
            img.set(x, y, color);
        }
    }
    img
}
