/// Number of categories fetched together when the caller does not choose.
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Splits `items` into contiguous batches for concurrent fetching.
///
/// The batch count is `max(1, len / batch_size)` (floored), so a remainder is
/// folded into the leading batches instead of forming a new undersized one:
/// batch sizes differ by at most one, larger batches first. A `batch_size` of
/// zero is treated as one. Every element lands in exactly one batch, in order.
/// Empty input yields no batches.
pub fn partition<T: Clone>(items: &[T], batch_size: usize) -> Vec<Vec<T>> {
    if items.is_empty() {
        return Vec::new();
    }

    let batch_size = batch_size.max(1);
    let count = (items.len() / batch_size).max(1);
    let base = items.len() / count;
    let extra = items.len() % count;

    let mut batches = Vec::with_capacity(count);
    let mut start = 0;
    for index in 0..count {
        let len = base + usize::from(index < extra);
        batches.push(items[start..start + len].to_vec());
        start += len;
    }
    batches
}
