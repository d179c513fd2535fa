/// Split `items` into consecutive batches of at most `size` elements,
/// preserving order. The last batch may be shorter. A `size` of zero yields
/// no batches at all.
pub fn split_batches<T>(items: &[T], size: usize) -> Vec<&[T]> {
    if size == 0 {
        return Vec::new();
    }

    items.chunks(size).collect()
}
