//! Tooltip content selection, placement and visibility

use plot_tooltip_shared::{Point, Size, TooltipSettings};

use crate::host::{OverlayElement, OverlayState};
use crate::options::{AccessorError, ContentFn, DescribeRecord};

/// Escape text for insertion as markup
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TooltipContent {
    /// Set as text content
    Text(String),
    /// Set as inner markup
    Markup(String),
}

/// Picks and runs the content function for a record
pub struct ContentRenderer<R> {
    text: Option<ContentFn<R>>,
    html: Option<ContentFn<R>>,
    allow_html: bool,
}

impl<R: DescribeRecord> ContentRenderer<R> {
    pub fn new(text: Option<ContentFn<R>>, html: Option<ContentFn<R>>, allow_html: bool) -> Self {
        Self {
            text,
            html,
            allow_html,
        }
    }

    /// Trusted markup, then escaped markup, then text, then the record itself
    pub fn render(&self, record: &R, index: usize) -> Result<TooltipContent, AccessorError> {
        if let Some(html) = &self.html {
            let markup = html(record, index)?;
            return Ok(if self.allow_html {
                TooltipContent::Markup(markup)
            } else {
                TooltipContent::Markup(escape_html(&markup))
            });
        }
        if let Some(text) = &self.text {
            return Ok(TooltipContent::Text(text(record, index)?));
        }
        Ok(TooltipContent::Text(record.describe()))
    }
}

/// Keep an overlay of `size` at `anchor` fully inside the viewport
///
/// Each axis is clamped to `[padding, viewport - size - padding]`. An overlay
/// too large for the viewport pins to `padding`.
pub fn clamp_position(anchor: Point, size: Size, viewport: Size, padding: f64) -> Point {
    let clamp_axis = |value: f64, extent: f64, available: f64| {
        let max = available - extent - padding;
        value.min(max).max(padding)
    };
    Point::new(
        clamp_axis(anchor.x, size.width, viewport.width),
        clamp_axis(anchor.y, size.height, viewport.height),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

/// Owns the overlay element for one attachment
pub struct TooltipPresenter<O: OverlayElement> {
    overlay: O,
    visibility: Visibility,
    offset: Point,
    padding: f64,
    removed: bool,
}

impl<O: OverlayElement> TooltipPresenter<O> {
    pub fn new(overlay: O, settings: &TooltipSettings) -> Self {
        overlay.set_state(OverlayState::Hidden);
        Self {
            overlay,
            visibility: Visibility::Hidden,
            offset: Point::new(settings.offset_x, settings.offset_y),
            padding: settings.clamp_padding,
            removed: false,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Set content, measure, clamp and reveal; returns the final position
    pub fn show(&mut self, content: &TooltipContent, pointer: Point, viewport: Size) -> Point {
        match content {
            TooltipContent::Text(text) => self.overlay.set_text(text),
            TooltipContent::Markup(markup) => self.overlay.set_markup(markup),
        }

        // Measure with the new content, laid out but not yet shown
        self.overlay.set_state(OverlayState::Measuring);
        let size = self.overlay.measure();
        let anchor = pointer.offset(self.offset.x, self.offset.y);
        let position = clamp_position(anchor, size, viewport, self.padding);

        self.overlay.set_position(position);
        self.overlay.set_state(OverlayState::Visible);
        self.visibility = Visibility::Visible;
        position
    }

    pub fn hide(&mut self) {
        if self.visibility == Visibility::Visible {
            self.overlay.set_state(OverlayState::Hidden);
            self.visibility = Visibility::Hidden;
        }
    }

    /// Hide and detach the overlay; later calls do nothing
    pub fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.hide();
        self.overlay.remove();
        self.removed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
        size: Size,
    }

    impl OverlayElement for Rc<Recorder> {
        fn set_text(&self, text: &str) {
            self.calls.borrow_mut().push(format!("text:{text}"));
        }
        fn set_markup(&self, markup: &str) {
            self.calls.borrow_mut().push(format!("markup:{markup}"));
        }
        fn set_state(&self, state: OverlayState) {
            self.calls.borrow_mut().push(format!("state:{state:?}"));
        }
        fn measure(&self) -> Size {
            self.calls.borrow_mut().push("measure".to_string());
            self.size
        }
        fn set_position(&self, position: Point) {
            self.calls
                .borrow_mut()
                .push(format!("position:{},{}", position.x, position.y));
        }
        fn remove(&self) {
            self.calls.borrow_mut().push("remove".to_string());
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_content_policy() {
        let html: ContentFn<String> = Rc::new(|r, _| Ok(format!("<b>{r}</b>")));
        let text: ContentFn<String> = Rc::new(|r, i| Ok(format!("{i}: {r}")));
        let record = "A&B".to_string();

        let trusted = ContentRenderer::new(Some(text.clone()), Some(html.clone()), true);
        assert_eq!(
            trusted.render(&record, 0).unwrap(),
            TooltipContent::Markup("<b>A&B</b>".to_string())
        );

        let untrusted = ContentRenderer::new(None, Some(html), false);
        match untrusted.render(&record, 0).unwrap() {
            TooltipContent::Markup(markup) => {
                assert!(!markup.contains('<'));
                assert!(!markup.contains('>'));
                assert_eq!(markup.matches('&').count(), markup.matches("&amp;").count()
                    + markup.matches("&lt;").count()
                    + markup.matches("&gt;").count());
            }
            other => panic!("unexpected content {other:?}"),
        }

        let plain = ContentRenderer::new(Some(text), None, true);
        assert_eq!(
            plain.render(&record, 4).unwrap(),
            TooltipContent::Text("4: A&B".to_string())
        );

        let fallback: ContentRenderer<String> = ContentRenderer::new(None, None, false);
        assert_eq!(
            fallback.render(&record, 0).unwrap(),
            TooltipContent::Text("A&B".to_string())
        );
    }

    #[test]
    fn test_content_errors_propagate() {
        let failing: ContentFn<String> = Rc::new(|_, _| Err(AccessorError::new("boom")));
        let renderer = ContentRenderer::new(Some(failing), None, false);
        assert!(renderer.render(&"x".to_string(), 0).is_err());
    }

    #[test]
    fn test_clamp_position() {
        let viewport = Size::new(800.0, 600.0);
        let size = Size::new(120.0, 40.0);
        let padding = 8.0;

        let inside = clamp_position(Point::new(100.0, 100.0), size, viewport, padding);
        assert_eq!(inside, Point::new(100.0, 100.0));

        let bottom_right = clamp_position(Point::new(790.0, 590.0), size, viewport, padding);
        assert_eq!(bottom_right, Point::new(672.0, 552.0));

        let top_left = clamp_position(Point::new(-50.0, 2.0), size, viewport, padding);
        assert_eq!(top_left, Point::new(8.0, 8.0));

        for &(x, y) in &[(-1000.0, -1000.0), (400.0, 300.0), (5000.0, 5000.0)] {
            let p = clamp_position(Point::new(x, y), size, viewport, padding);
            assert!(padding <= p.x && p.x <= viewport.width - size.width - padding);
            assert!(padding <= p.y && p.y <= viewport.height - size.height - padding);
        }

        let oversized = clamp_position(Point::new(300.0, 300.0), Size::new(900.0, 700.0), viewport, padding);
        assert_eq!(oversized, Point::new(8.0, 8.0));
    }

    #[test]
    fn test_show_measures_after_content() {
        let overlay = Rc::new(Recorder {
            size: Size::new(100.0, 20.0),
            ..Default::default()
        });
        let settings = TooltipSettings::default();
        let mut presenter = TooltipPresenter::new(overlay.clone(), &settings);
        assert_eq!(presenter.visibility(), Visibility::Hidden);

        let position = presenter.show(
            &TooltipContent::Text("hello".to_string()),
            Point::new(10.0, 10.0),
            Size::new(800.0, 600.0),
        );
        assert_eq!(position, Point::new(22.0, 22.0));
        assert!(presenter.is_visible());

        let calls = overlay.calls.borrow().clone();
        assert_eq!(
            calls,
            vec![
                "state:Hidden",
                "text:hello",
                "state:Measuring",
                "measure",
                "position:22,22",
                "state:Visible",
            ]
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let overlay = Rc::new(Recorder::default());
        let mut presenter = TooltipPresenter::new(overlay.clone(), &TooltipSettings::default());
        presenter.show(
            &TooltipContent::Text("x".to_string()),
            Point::new(0.0, 0.0),
            Size::new(100.0, 100.0),
        );

        presenter.remove();
        presenter.remove();
        assert!(!presenter.is_visible());
        let removes = overlay.calls.borrow().iter().filter(|c| *c == "remove").count();
        assert_eq!(removes, 1);
    }
}
