//! Replays a [`PageLayout`] onto a device context

use crate::layout::{PageFont, PageLayout};
use kermes_printer::{DeviceContext, PrintResult};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// What happened while drawing a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageReport {
    /// Text instructions drawn
    pub drawn: usize,
    /// Font switches that failed and kept the previous font
    pub font_fallbacks: usize,
}

/// Fonts created on one device context, plus the one currently selected
struct FontState<F> {
    created: HashMap<PageFont, F>,
    active: Option<PageFont>,
}

impl<F: Clone> FontState<F> {
    fn new() -> Self {
        Self {
            created: HashMap::new(),
            active: None,
        }
    }

    /// Select `font`, creating it on first use.
    ///
    /// Returns `false` when creation failed; the previously selected font
    /// stays active in that case.
    fn select<D>(&mut self, dc: &mut D, font: PageFont) -> bool
    where
        D: DeviceContext<Font = F>,
    {
        if self.active == Some(font) {
            return true;
        }

        let handle = match self.created.get(&font) {
            Some(h) => h.clone(),
            None => match dc.create_font(&font.spec()) {
                Ok(h) => {
                    self.created.insert(font, h.clone());
                    h
                }
                Err(e) => {
                    warn!(
                        font = font.name(),
                        kept = self.active.map(PageFont::name),
                        error = %e,
                        "font creation failed, keeping previous font"
                    );
                    return false;
                }
            },
        };

        dc.select_font(&handle);
        self.active = Some(font);
        true
    }
}

/// Draw one document of one page
///
/// The device context is only borrowed: it is released by its owner, which
/// also aborts the document if drawing stopped halfway.
#[instrument(skip(dc, layout), fields(title = %layout.title, instructions = layout.instructions.len()))]
pub fn print_page<D: DeviceContext>(dc: &mut D, layout: &PageLayout) -> PrintResult<PageReport> {
    let mut report = PageReport::default();
    let mut fonts = FontState::new();

    dc.start_doc(&layout.title)?;
    dc.start_page()?;

    if !fonts.select(dc, PageFont::BodyNormal) {
        report.font_fallbacks += 1;
    }

    for instr in &layout.instructions {
        if !fonts.select(dc, instr.font) {
            report.font_fallbacks += 1;
        }
        dc.text_out(instr.x, instr.y, &instr.text)?;
        report.drawn += 1;
    }

    dc.end_page()?;
    dc.end_doc()?;

    debug!(
        drawn = report.drawn,
        font_fallbacks = report.font_fallbacks,
        "page printed"
    );
    Ok(report)
}
