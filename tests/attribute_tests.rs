use loom_heatmap::data_types::{
    count_elements, finite_min_max, format_value, most_frequent, n_most_frequent, AttrData,
    Attribute,
};

#[test]
fn test_n_most_frequent_descending_by_count() {
    let values = ["a", "a", "b", "b", "b", "c"];
    let top = n_most_frequent(values.iter().copied(), 2);
    assert_eq!(top, vec!["b", "a"]);
}

#[test]
fn test_n_most_frequent_ties_keep_first_seen_order() {
    let values = ["x", "y", "x", "y", "z"];
    assert_eq!(n_most_frequent(values.iter().copied(), 2), vec!["x", "y"]);
    // z loses the tie-break against nothing: it simply ranks last
    assert_eq!(
        n_most_frequent(values.iter().copied(), 3),
        vec!["x", "y", "z"]
    );
}

#[test]
fn test_n_most_frequent_truncates() {
    let values = [1u32, 1, 2];
    assert_eq!(n_most_frequent(values.iter().copied(), 0), Vec::<u32>::new());
    assert_eq!(n_most_frequent(values.iter().copied(), 10), vec![1, 2]);
}

#[test]
fn test_most_frequent() {
    assert_eq!(most_frequent(["a", "b", "b"].iter().copied()), Some("b"));
    assert_eq!(most_frequent(std::iter::empty::<u32>()), None);
}

#[test]
fn test_count_elements_first_seen_order() {
    let counts = count_elements(&[3u32, 1, 3, 2, 1, 3]);
    let pairs: Vec<(u32, usize)> = counts.iter().map(|u| (u.value, u.count)).collect();
    assert_eq!(pairs, vec![(3, 3), (1, 2), (2, 1)]);
}

#[test]
fn test_from_floats_excludes_non_finite_from_scale() {
    let attr = Attribute::from_floats(
        "reads",
        vec![1.0, f32::NAN, -3.5, f32::INFINITY, 7.0, f32::NEG_INFINITY],
    );
    assert_eq!(attr.min, Some(-3.5));
    assert_eq!(attr.max, Some(7.0));
    assert!(!attr.all_missing());
}

#[test]
fn test_all_missing_float_vector() {
    let attr = Attribute::from_floats("empty", vec![f32::NAN, f32::NAN]);
    assert_eq!(attr.min, None);
    assert_eq!(attr.max, None);
    assert!(attr.all_missing());
}

#[test]
fn test_from_strings_round_trips_labels() {
    let attr = Attribute::from_strings("clusters", &["t-cell", "b-cell", "t-cell", "", "nk"]);
    assert_eq!(attr.len(), 5);
    assert_eq!(attr.label_at(0), Some("t-cell"));
    assert_eq!(attr.label_at(1), Some("b-cell"));
    assert_eq!(attr.label_at(2), Some("t-cell"));
    assert_eq!(attr.label_at(3), None); // empty string is the missing marker
    assert_eq!(attr.label_at(4), Some("nk"));

    match &attr.data {
        AttrData::Categorical { codes, labels } => {
            assert_eq!(codes, &vec![1, 2, 1, 0, 3]);
            assert_eq!(labels, &vec!["t-cell", "b-cell", "nk"]);
        }
        AttrData::Float(_) => panic!("expected categorical storage"),
    }

    // counts exclude the missing code
    let pairs: Vec<(u32, usize)> = attr.uniques.iter().map(|u| (u.value, u.count)).collect();
    assert_eq!(pairs, vec![(1, 2), (2, 1), (3, 1)]);
}

#[test]
fn test_from_codes_rejects_unlabelled_codes() {
    let result = Attribute::from_codes("bad", vec![0, 1, 5], vec!["only-one".to_string()]);
    assert!(result.is_err());
}

#[test]
fn test_float_view_of_categorical_is_the_code() {
    let attr = Attribute::from_strings("c", &["x", "y", "x"]);
    assert_eq!(attr.float_at(0), Some(1.0));
    assert_eq!(attr.float_at(1), Some(2.0));
    assert_eq!(attr.float_at(9), None);
}

#[test]
fn test_display_at() {
    let floats = Attribute::from_floats("f", vec![2.0, 0.125, f32::NAN]);
    assert_eq!(floats.display_at(0), Some("2".to_string()));
    assert_eq!(floats.display_at(1), Some("0.125".to_string()));
    assert_eq!(floats.display_at(2), None);

    let cats = Attribute::from_strings("c", &["alpha", ""]);
    assert_eq!(cats.display_at(0), Some("alpha".to_string()));
    assert_eq!(cats.display_at(1), None);
}

#[test]
fn test_format_value() {
    assert_eq!(format_value(3.0), "3");
    assert_eq!(format_value(-17.0), "-17");
    assert_eq!(format_value(0.6), "0.600");
}

#[test]
fn test_finite_min_max() {
    assert_eq!(finite_min_max(&[]), None);
    assert_eq!(finite_min_max(&[f32::NAN]), None);
    assert_eq!(finite_min_max(&[2.0, -1.0, f32::NAN, 5.0]), Some((-1.0, 5.0)));
}
