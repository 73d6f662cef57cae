/// Index of the first maximum in a row
///
/// Ties resolve to the lowest index so that repeated calls over equal rows
/// are deterministic.
pub fn argmax(row: &[f32]) -> usize {
    let mut best = 0;
    for (index, value) in row.iter().enumerate() {
        if *value > row[best] {
            best = index;
        }
    }

    best
}

/// Collapse a one-hot label matrix into class indices, one per row
pub fn argmax_rows(rows: &[Vec<f32>]) -> Vec<usize> {
    rows.iter().map(|row| argmax(row)).collect()
}

/// Expand class indices into a dense one-hot matrix with `classes` columns
pub fn one_hot(indices: &[usize], classes: usize) -> Vec<Vec<f32>> {
    indices
        .iter()
        .map(|&index| {
            let mut row = vec![0.0; classes];
            row[index] = 1.0;
            row
        })
        .collect()
}
