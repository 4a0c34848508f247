#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mesh_ntb::SpatialSort;
use mesh_ntb_fuzz::is_reasonable;

#[derive(Debug, Arbitrary)]
struct Input {
    points: Vec<[f32; 3]>,
    query: [f32; 3],
    radius: f32,
}

fuzz_target!(|input: Input| {
    let Input {
        points,
        query,
        radius,
    } = input;

    if !points.iter().chain([&query]).flatten().copied().all(is_reasonable)
        || !is_reasonable(radius)
    {
        return;
    }
    let radius = radius.abs();

    let sort = SpatialSort::new(&points);
    let distances = sort.distances().collect::<Vec<_>>();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));

    let expected = points
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            let d = [p[0] - query[0], p[1] - query[1], p[2] - query[2]];
            d[0] * d[0] + d[1] * d[1] + d[2] * d[2] <= radius * radius
        })
        .map(|(i, _)| i as u32)
        .collect::<Vec<_>>();

    let mut found = Vec::new();
    sort.find_positions(query, radius, &mut found);
    found.sort_unstable();
    assert_eq!(found, expected);

    for (i, &point) in points.iter().enumerate() {
        sort.find_identical_positions(point, &mut found);
        assert!(found.contains(&(i as u32)));
    }

    let (table, clusters) = sort.generate_mapping_table(radius);
    assert_eq!(table.len(), points.len());
    assert!(table.iter().all(|&id| id < clusters));
});
