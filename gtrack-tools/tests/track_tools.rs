use pretty_assertions::assert_eq;
use rstest::*;

use gtrack_core::{GenomeRegion, GtrackConfig, GtrackError, TrackFormat, TrackName};
use gtrack_tools::aggregation::*;
use gtrack_tools::operations::*;
use gtrack_tools::{OverlapAlgorithm, WeightSum};
use gtrack_track::{GenomeElement, Track, TrackBuilder};

const GENOME: &str = "testgenome";
const TOLERANCE: f64 = 1e-2;

struct TestData {
    _tempdir: tempfile::TempDir,
    config: GtrackConfig,
}

impl TestData {
    fn write(&self, name: &str, builder: &TrackBuilder) -> TrackName {
        let name: TrackName = name.parse().unwrap();
        builder.write(&self.config, GENOME, &name).unwrap();
        name
    }

    fn open(&self, name: &TrackName, allow_overlaps: bool) -> Track {
        Track::open(&self.config, GENOME, name, allow_overlaps).unwrap()
    }
}

#[fixture]
fn data() -> TestData {
    let tempdir = tempfile::tempdir().unwrap();
    let config = GtrackConfig::new(tempdir.path());
    TestData {
        _tempdir: tempdir,
        config,
    }
}

fn sequence_lengths() -> Vec<(&'static str, i64)> {
    vec![("chr21", 1000), ("chrM", 300)]
}

fn whole_genome() -> Vec<GenomeRegion> {
    sequence_lengths()
        .into_iter()
        .map(|(chr, len)| GenomeRegion::new(GENOME, chr, 0, len).unwrap())
        .collect()
}

fn segment_track_a() -> TrackBuilder {
    let mut builder = TrackBuilder::new(TrackFormat::Segments);
    builder
        .add_element(GenomeElement::segment("chr21", 100, 200))
        .add_element(GenomeElement::segment("chr21", 150, 250))
        .add_element(GenomeElement::segment("chr21", 200, 250))
        .add_element(GenomeElement::segment("chrM", 100, 200))
        .with_sequence_lengths(sequence_lengths());
    builder
}

fn segment_track_b() -> TrackBuilder {
    let mut builder = TrackBuilder::new(TrackFormat::Segments);
    builder
        .add_element(GenomeElement::segment("chr21", 150, 250))
        .add_element(GenomeElement::segment("chrM", 0, 200))
        .with_sequence_lengths(sequence_lengths());
    builder
}

#[rstest]
fn test_overlap_of_segment_tracks(data: TestData) {
    let a = data.open(&data.write("segments:a", &segment_track_a()), false);
    let b = data.open(&data.write("segments:b", &segment_track_b()), false);

    for algorithm in [OverlapAlgorithm::Sweep, OverlapAlgorithm::Encoded] {
        let total = overlap_in_regions(&a, &b, &whole_genome(), algorithm).unwrap();
        assert_eq!(total, 200, "{}", algorithm);
    }

    let region = GenomeRegion::new(GENOME, "chr21", 0, 1000).unwrap();
    let mut view_a = a.get_track_view(&region).unwrap();
    let mut view_b = b.get_track_view(&region).unwrap();
    assert_eq!(overlap(&mut view_a, &mut view_b).unwrap(), 100);
    assert_eq!(overlap_iter(&mut view_a, &mut view_b).unwrap(), 100);
}

#[rstest]
fn test_coverage_of_segment_track(data: TestData) {
    let a = data.open(&data.write("segments:a", &segment_track_a()), false);

    assert_eq!(coverage_in_regions(&a, &whole_genome()).unwrap(), 250);
    assert_eq!(fold_bounding_regions(&a, coverage).unwrap(), 250);
}

#[rstest]
fn test_element_count_of_genome_partition(data: TestData) {
    let mut builder = TrackBuilder::new(TrackFormat::GenomePartition);
    builder
        .add_bounding_region(
            "chr21",
            0,
            1000,
            [250, 500, 750, 1000]
                .into_iter()
                .map(|end| GenomeElement::boundary("chr21", end))
                .collect(),
        )
        .unwrap()
        .add_bounding_region("chrM", 0, 200, vec![GenomeElement::boundary("chrM", 200)])
        .unwrap();
    let name = data.write("partition", &builder);

    let count = count_elements_in_all_bounding_regions(&data.config, GENOME, &name, false).unwrap();
    assert_eq!(count, 5);

    let track = data.open(&name, false);
    assert_eq!(fold_bounding_regions(&track, coverage).unwrap(), 5);
}

#[rstest]
fn test_sum_of_values_of_function(data: TestData) {
    let mut builder = TrackBuilder::new(TrackFormat::Function);
    builder
        .add_bounding_region(
            "chr21",
            0,
            5,
            (1..=5).map(|v| GenomeElement::value(v as f64)).collect(),
        )
        .unwrap()
        .add_bounding_region(
            "chrM",
            0,
            2,
            vec![GenomeElement::value(1.0), GenomeElement::value(2.0)],
        )
        .unwrap();
    let track = data.open(&data.write("function", &builder), false);

    let total = fold_bounding_regions(&track, sum_of_values).unwrap();
    assert!((total - 18.0).abs() < TOLERANCE, "{}", total);

    let regions = vec![
        GenomeRegion::new(GENOME, "chr21", 0, 5).unwrap(),
        GenomeRegion::new(GENOME, "chrM", 0, 2).unwrap(),
    ];
    let total = sum_of_values_in_regions(&track, &regions).unwrap();
    assert!((total - 18.0).abs() < TOLERANCE, "{}", total);
}

#[rstest]
fn test_sum_of_values_of_valued_segments(data: TestData) {
    let mut builder = TrackBuilder::new(TrackFormat::ValuedSegments);
    builder
        .add_element(GenomeElement::segment("chr21", 100, 200).with_val(100.1))
        .add_element(GenomeElement::segment("chr21", 150, 250).with_val(100.1))
        .add_element(GenomeElement::segment("chr21", 300, 400).with_val(100.1))
        .add_element(GenomeElement::segment("chrM", 0, 50).with_val(100.1))
        .with_sequence_lengths(sequence_lengths());
    let name = data.write("valued", &builder);

    // overlapping values can only be stored with overlaps
    assert!(Track::open(&data.config, GENOME, &name, false).is_err());

    let track = data.open(&name, true);
    let total = sum_of_values_in_regions(&track, &whole_genome()).unwrap();
    assert!((total - 400.4).abs() < TOLERANCE, "{}", total);
}

#[rstest]
fn test_sum_of_weights_of_linked_segments(data: TestData) {
    let mut builder = TrackBuilder::new(TrackFormat::LinkedSegments);
    builder
        .add_element(
            GenomeElement::segment("chr21", 100, 200)
                .with_id("a")
                .with_edge("b", 1.1),
        )
        .add_element(
            GenomeElement::segment("chr21", 150, 250)
                .with_id("b")
                .with_edge("a", 2.2)
                .with_edge("c", 3.3),
        )
        .add_element(
            GenomeElement::segment("chr21", 200, 250)
                .with_id("c")
                .with_edge("a", 4.4)
                .with_edge("d", 5.5),
        )
        .add_element(
            GenomeElement::segment("chrM", 100, 200)
                .with_id("d")
                .with_edge("c", 6.6),
        )
        .with_sequence_lengths(sequence_lengths());
    let name = data.write("linked", &builder);

    // overlapping linked segments are only stored with overlaps
    assert!(Track::open(&data.config, GENOME, &name, false).is_err());

    let track = data.open(&name, true);
    let bulk = sum_of_weights_in_regions(&track, &whole_genome(), WeightSum::Bulk).unwrap();
    let streaming =
        sum_of_weights_in_regions(&track, &whole_genome(), WeightSum::Streaming).unwrap();

    assert!((bulk - 23.1).abs() < TOLERANCE, "{}", bulk);
    assert!((bulk - streaming).abs() < TOLERANCE);
}

#[rstest]
fn test_overlap_of_track_with_overlapping_segments(data: TestData) {
    let a = data.open(&data.write("segments:a", &segment_track_a()), true);
    let b = data.open(&data.write("segments:b", &segment_track_b()), false);
    let chr21 = vec![GenomeRegion::new(GENOME, "chr21", 0, 1000).unwrap()];

    let total = overlap_in_regions(&a, &b, &chr21, OverlapAlgorithm::Sweep).unwrap();
    assert_eq!(total, 150);
    let total = overlap_in_regions(&a, &b, &whole_genome(), OverlapAlgorithm::Sweep).unwrap();
    assert_eq!(total, 250);

    let result = overlap_in_regions(&a, &b, &chr21, OverlapAlgorithm::Encoded);
    assert!(matches!(result, Err(GtrackError::MalformedSequence(_))));
}

#[rstest]
fn test_fold_is_sum_of_region_counts(data: TestData) {
    let a = data.open(&data.write("segments:a", &segment_track_a()), true);

    let per_region: usize = a
        .bounding_regions()
        .get_all_bounding_regions()
        .iter()
        .map(|br| count_elements(&a.get_track_view(&br.region).unwrap()))
        .sum();
    let folded = count_elements_in_all_bounding_regions(
        &data.config,
        GENOME,
        &"segments:a".parse().unwrap(),
        true,
    )
    .unwrap();

    assert_eq!(folded, 4);
    assert_eq!(folded, per_region);
}
