use std::mem;

use crate::edge::WeightedEdge;

pub const SEGMENT_SIZE: usize = 1024;

/// Accumulates items into fixed-size segments, so that growing the list
/// never reallocates what has already been pushed.
pub struct SegmentList<T> {
    size:     usize,
    segments: Vec<Vec<T>>,
    current:  Vec<T>,
    len:      usize,
}

impl<T> SegmentList<T> {
    pub fn new(size: usize) -> SegmentList<T> {
        SegmentList {
            size:     size.max(1),
            segments: Vec::new(),
            current:  Vec::with_capacity(size.max(1)),
            len:      0,
        }
    }
    pub fn push(&mut self, item: T) {
        if self.current.len() == self.size {
            self.segments.push(mem::replace(&mut self.current, Vec::with_capacity(self.size)));
        }
        self.current.push(item);
        self.len += 1;
    }
    pub fn extend<I: Iterator<Item=T>>(&mut self, iterator: I) {
        for item in iterator { self.push(item); }
    }
    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn finalize(&mut self) -> Vec<Vec<T>> {
        if !self.current.is_empty() {
            self.segments.push(mem::replace(&mut self.current, Vec::with_capacity(self.size)));
        }
        self.len = 0;
        mem::take(&mut self.segments)
    }
}

/// Sort the segmented edge list by (source, destination): a stable pass on
/// the destination followed by a stable pass on the source.
pub fn sort_edges(edges: &mut Vec<Vec<WeightedEdge>>) {
    let mut free = Vec::new();
    radix_sort_64(edges, &mut free, &|e: &WeightedEdge| e.destination());
    radix_sort_64(edges, &mut free, &|e: &WeightedEdge| e.source());
}

/// Stable LSD radix sort on a 64-bit key. Digits above the highest set bit
/// of the largest key are all zero and are not shuffled.
pub fn radix_sort_64<V: Copy+Default, F: Fn(&V)->u64>(data: &mut Vec<Vec<V>>, free: &mut Vec<Vec<V>>, func: &F) {
    let max = data.iter().flat_map(|list| list.iter()).map(func).max().unwrap_or(0);
    let digits = (64 - max.leading_zeros() as usize + 7) / 8;
    for digit in 0..digits {
        let shift = 8 * digit;
        radix_shuf(data, free, &|x| ((func(x) >> shift) & 0xFF) as u8);
    }
}

pub fn radix_shuf<V: Copy+Default, F: Fn(&V)->u8>(data: &mut Vec<Vec<V>>, free: &mut Vec<Vec<V>>, func: &F) {

    let mut part = vec![]; for _ in 0..256 { part.push(free.pop().unwrap_or_else(|| Vec::with_capacity(SEGMENT_SIZE))); }
    let mut full = vec![]; for _ in 0..256 { full.push(vec![]); }

    let buflen = 8;

    let mut temp = vec![Default::default(); buflen * 256];
    let mut counts = vec![0u8; 256];

    // loop through each buffer
    for mut vs in data.drain(..) {
        for v in vs.drain(..) {
            let key = func(&v) as usize;

            temp[buflen * key + counts[key] as usize] = v;
            counts[key] += 1;

            if counts[key] == buflen as u8 {
                part[key].extend_from_slice(&temp[(buflen * key) .. ((buflen * key) + buflen)]);

                if part[key].len() >= SEGMENT_SIZE {
                    let next = free.pop().unwrap_or_else(|| Vec::with_capacity(SEGMENT_SIZE));
                    full[key].push(mem::replace(&mut part[key], next));
                }

                counts[key] = 0;
            }
        }

        free.push(vs);
    }

    // check each partially filled buffer
    for (key, mut p) in part.drain(..).enumerate() {
        p.extend_from_slice(&temp[(buflen * key) .. ((buflen * key) + counts[key] as usize)]);

        if !p.is_empty() { full[key].push(p); }
        else             { free.push(p); }
    }

    // re-order buffers
    for mut cs in full.drain(..) {
        data.extend(cs.drain(..));
    }
}
