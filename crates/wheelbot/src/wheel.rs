use wheelbot_chart::{ChartError, ChartOptions, ChartRenderer, RenderedChart};
use wheelbot_core::chart_labels;

/// Chart capability used by the bot and the terminal commands
pub trait WheelRenderer: Send + Sync {
    /// Render one wheel over the eight facet scores
    fn render(&self, values: &[u8], options: &ChartOptions) -> Result<RenderedChart, ChartError>;

    /// Whether an SVG accompanies the PNG
    fn vector(&self) -> bool;
}

impl WheelRenderer for ChartRenderer {
    fn render(&self, values: &[u8], options: &ChartOptions) -> Result<RenderedChart, ChartError> {
        ChartRenderer::render(self, values, &chart_labels(), options)
    }

    fn vector(&self) -> bool {
        self.settings().vector
    }
}
