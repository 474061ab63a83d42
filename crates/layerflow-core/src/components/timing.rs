//! Per-child timing.

use std::time::Instant;

use tracing::info;

use layerflow_protocols::{FlowContext, Handler};

/// Run `handler`, recording how long it took when the context asks for it.
pub async fn handle_timed(handler: &dyn Handler, ctx: &FlowContext) -> bool {
    if !ctx.show_duration {
        return handler.handle(ctx).await;
    }

    let start = Instant::now();
    let result = handler.handle(ctx).await;
    let elapsed = start.elapsed();

    ctx.record_duration(handler.name(), elapsed);
    info!(
        name = handler.name(),
        elapsed_ms = elapsed.as_millis() as u64,
        result,
        "Duration for {}: {} ms",
        handler.name(),
        elapsed.as_millis()
    );
    result
}
