use gtrack_core::{CoverageRule, GenomeRegion, GtrackError, Result, TrackFormat};
use gtrack_store::{Array, VirtualColumn};

/// The stored columns backing one view. Which ones are present depends on the format.
#[derive(Debug, Clone, Default)]
pub struct ViewColumns {
    pub starts: Option<VirtualColumn>,
    pub ends: Option<VirtualColumn>,
    pub vals: Option<VirtualColumn>,
    pub ids: Option<VirtualColumn>,
    pub edges: Option<VirtualColumn>,
    pub weights: Option<VirtualColumn>,
}

///
/// A track restricted to one genome region.
///
/// All columns of a view share one row range; reslicing the view reslices
/// every column identically. Columns that are not stored (the ends of a
/// points track, the starts of a dense track) are derived on demand.
///
#[derive(Debug, Clone)]
pub struct TrackView {
    region: GenomeRegion,
    format: TrackFormat,
    allow_overlaps: bool,
    dense_first_start: i64,
    columns: ViewColumns,
}

impl TrackView {
    ///
    /// Assemble a view from already positioned columns.
    ///
    /// `dense_first_start` is the start coordinate of the first row of a dense
    /// view (ignored for sparse formats).
    ///
    pub fn new(
        region: GenomeRegion,
        format: TrackFormat,
        allow_overlaps: bool,
        dense_first_start: i64,
        columns: ViewColumns,
    ) -> Result<Self> {
        let view = TrackView {
            region,
            format,
            allow_overlaps,
            dense_first_start,
            columns,
        };

        let expected = format.columns();
        let present = |c: &Option<VirtualColumn>| c.is_some();
        let linked = present(&view.columns.ids)
            && present(&view.columns.edges)
            && present(&view.columns.weights);
        if present(&view.columns.starts) != expected.starts
            || present(&view.columns.ends) != expected.ends
            || present(&view.columns.vals) != expected.vals
            || linked != expected.linked
        {
            return Err(GtrackError::InvalidFormat(format!(
                "columns of view don't match format '{}'",
                format
            )));
        }

        let aligned = {
            let mut offsets = view.active_columns().map(|c| c.offset());
            offsets
                .next()
                .is_none_or(|first| offsets.all(|offset| offset == first))
        };
        if !aligned {
            return Err(GtrackError::CorruptStore(
                "columns of view are not row-aligned".to_string(),
            ));
        }

        Ok(view)
    }

    pub fn region(&self) -> &GenomeRegion {
        &self.region
    }

    pub fn format(&self) -> TrackFormat {
        self.format
    }

    pub fn allow_overlaps(&self) -> bool {
        self.allow_overlaps
    }

    fn active_columns(&self) -> impl Iterator<Item = &VirtualColumn> {
        [
            &self.columns.starts,
            &self.columns.ends,
            &self.columns.vals,
            &self.columns.ids,
            &self.columns.edges,
            &self.columns.weights,
        ]
        .into_iter()
        .flatten()
    }

    fn active_columns_mut(&mut self) -> impl Iterator<Item = &mut VirtualColumn> {
        [
            &mut self.columns.starts,
            &mut self.columns.ends,
            &mut self.columns.vals,
            &mut self.columns.ids,
            &mut self.columns.edges,
            &mut self.columns.weights,
        ]
        .into_iter()
        .flatten()
    }

    /// Number of elements (rows) in the view
    pub fn num_elements(&self) -> usize {
        self.active_columns().next().map_or(0, |c| c.len())
    }

    pub fn len(&self) -> usize {
        self.num_elements()
    }

    pub fn is_empty(&self) -> bool {
        self.num_elements() == 0
    }

    ///
    /// Reslice every column of the view with relative, possibly negative
    /// indices (see [`VirtualColumn::update_offset`]).
    ///
    pub fn slice(&mut self, start: Option<i64>, stop: Option<i64>) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        let n = self.len() as i64;
        let absolute = |relative: Option<i64>, default: i64| match relative {
            Some(r) if r >= 0 => r,
            Some(r) => n + r,
            None => default,
        };
        let lower = absolute(start, 0);
        let upper = absolute(stop, n);
        if lower < 0 || upper < lower || upper > n {
            return Err(GtrackError::InvalidOffset {
                start: lower,
                end: upper,
                len: n as usize,
            });
        }

        if self.format.is_partition() {
            if lower > 0 {
                let ends = self.ends_as_array()?;
                self.dense_first_start = ends[lower as usize - 1];
            }
        } else if self.format.is_dense() {
            self.dense_first_start += lower;
        }

        for column in self.active_columns_mut() {
            column.update_offset(Some(lower), Some(upper), None)?;
        }
        Ok(())
    }

    pub fn starts_as_array(&mut self) -> Result<Vec<i64>> {
        let n = self.len();
        if self.format.is_partition() {
            let ends = self.ends_as_array()?;
            let mut starts = Vec::with_capacity(n);
            if n > 0 {
                starts.push(self.dense_first_start);
                starts.extend_from_slice(&ends[..n - 1]);
            }
            return Ok(starts);
        }

        match self.columns.starts.as_mut() {
            Some(starts) => Ok(starts.i64_values()?.to_vec()),
            None => Ok((0..n as i64).map(|i| self.dense_first_start + i).collect()),
        }
    }

    pub fn ends_as_array(&mut self) -> Result<Vec<i64>> {
        if self.format.is_point_like() {
            return match self.columns.starts.as_ref() {
                Some(starts) => starts.ends_from_starts(),
                None => Ok(Vec::new()),
            };
        }

        let region_end = self.region.end;
        match self.columns.ends.as_mut() {
            Some(ends) if self.format.is_partition() => {
                Ok(ends.i64_values()?.iter().map(|&e| e.min(region_end)).collect())
            }
            Some(ends) => Ok(ends.i64_values()?.to_vec()),
            None => Ok(self.starts_as_array()?.iter().map(|s| s + 1).collect()),
        }
    }

    pub fn vals_as_array(&mut self) -> Result<&[f64]> {
        let format = self.format;
        match self.columns.vals.as_mut() {
            Some(vals) => vals.f64_values(),
            None => Err(not_stored(format, "values")),
        }
    }

    pub fn ids_as_array(&mut self) -> Result<&[String]> {
        let format = self.format;
        match self.columns.ids.as_mut() {
            Some(ids) => ids.string_values(),
            None => Err(not_stored(format, "ids")),
        }
    }

    /// Edge ids, one row of `width` ids per element, padded with empty strings
    pub fn edges_as_array(&mut self) -> Result<&Array> {
        let format = self.format;
        match self.columns.edges.as_mut() {
            Some(edges) => edges.as_array(),
            None => Err(not_stored(format, "edges")),
        }
    }

    /// Edge weights, aligned with [`TrackView::edges_as_array`] and padded with NaN
    pub fn weights_as_array(&mut self) -> Result<&Array> {
        let format = self.format;
        match self.columns.weights.as_mut() {
            Some(weights) => weights.as_array(),
            None => Err(not_stored(format, "weights")),
        }
    }

    ///
    /// How much of the genome the view covers, following the format's
    /// [`CoverageRule`].
    ///
    pub fn coverage(&mut self) -> Result<i64> {
        match self.format.coverage_rule() {
            CoverageRule::SummedLength => {
                let ends: i64 = self.ends_as_array()?.iter().sum();
                let starts: i64 = self.starts_as_array()?.iter().sum();
                Ok(ends - starts)
            }
            CoverageRule::ElementCount => Ok(self.num_elements() as i64),
            CoverageRule::RowCount => Ok(self.len() as i64),
        }
    }

    ///
    /// Iterate over the elements of the view in row order.
    ///
    /// Every call starts a new pass over the same rows.
    ///
    pub fn iter(&mut self) -> Result<TrackElementIter<'_>> {
        let starts = self.starts_as_array()?;
        let ends = self.ends_as_array()?;
        for column in [
            &mut self.columns.vals,
            &mut self.columns.ids,
            &mut self.columns.edges,
            &mut self.columns.weights,
        ]
        .into_iter()
        .flatten()
        {
            column.as_array()?;
        }

        let columns = &self.columns;
        Ok(TrackElementIter {
            starts,
            ends,
            vals: cached(&columns.vals).and_then(|a| a.as_f64()),
            ids: cached(&columns.ids).and_then(|a| a.as_strings()),
            edges: cached(&columns.edges).and_then(|a| Some((a.as_strings()?, a.width()))),
            weights: cached(&columns.weights).and_then(|a| Some((a.as_f64()?, a.width()))),
            index: 0,
        })
    }
}

fn cached(column: &Option<VirtualColumn>) -> Option<&Array> {
    column.as_ref().and_then(|c| c.cached())
}

fn not_stored(format: TrackFormat, field: &str) -> GtrackError {
    GtrackError::InvalidFormat(format!("'{}' tracks have no {}", format, field))
}

///
/// One row of a [`TrackView`].
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackElement<'a> {
    start: i64,
    end: i64,
    val: Option<f64>,
    id: Option<&'a str>,
    edges: Option<&'a [String]>,
    weights: Option<&'a [f64]>,
}

impl<'a> TrackElement<'a> {
    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn val(&self) -> Option<f64> {
        self.val
    }

    pub fn id(&self) -> Option<&'a str> {
        self.id
    }

    /// Ids of the elements this one links to
    pub fn edges(self) -> impl Iterator<Item = &'a str> {
        self.edges
            .unwrap_or_default()
            .iter()
            .map(|e| e.as_str())
            .filter(|e| !e.is_empty())
    }

    /// Weights of the edges, in the same order as [`TrackElement::edges`]
    pub fn weights(self) -> impl Iterator<Item = f64> {
        let edges = self.edges.unwrap_or_default();
        self.weights
            .unwrap_or_default()
            .iter()
            .zip(edges.iter())
            .filter(|(w, e)| !e.is_empty() && !w.is_nan())
            .map(|(w, _)| *w)
    }
}

pub struct TrackElementIter<'a> {
    starts: Vec<i64>,
    ends: Vec<i64>,
    vals: Option<&'a [f64]>,
    ids: Option<&'a [String]>,
    edges: Option<(&'a [String], usize)>,
    weights: Option<(&'a [f64], usize)>,
    index: usize,
}

impl<'a> Iterator for TrackElementIter<'a> {
    type Item = TrackElement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.index;
        if i >= self.starts.len() || i >= self.ends.len() {
            return None;
        }
        self.index += 1;

        Some(TrackElement {
            start: self.starts[i],
            end: self.ends[i],
            val: self.vals.and_then(|v| v.get(i).copied()),
            id: self.ids.and_then(|v| v.get(i)).map(|s| s.as_str()),
            edges: self.edges.and_then(|(v, w)| v.get(i * w..(i + 1) * w)),
            weights: self.weights.and_then(|(v, w)| v.get(i * w..(i + 1) * w)),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.starts.len().min(self.ends.len()) - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TrackElementIter<'_> {}
