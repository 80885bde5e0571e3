use loopdb::{
    LoopDbError, PartsDb, Strand,
    adapter_site::AdapterSite,
    backbone::Backbone,
    base_sequence::BaseSequence,
    feature::Feature,
    part::Part,
    part_edge::PartEdge,
    restriction_enzyme::RestrictionEnzyme,
    settings::{CompositionSettings, FeatureCoordinates},
};

/// BsaI / adp1 / vecBody / bb1 plus a second backbone bb2 whose receiver
/// brackets children with ("CC", "GG").
fn snapshot_with(settings: CompositionSettings) -> PartsDb {
    let mut db = PartsDb::with_settings(settings);
    db.add_enzyme(RestrictionEnzyme::new("bsai", "BsaI", "GGTCTC"))
        .unwrap();
    db.add_site(AdapterSite::new("adp1", "adp1", "AA", "TT", "bsai"))
        .unwrap();
    db.add_site(AdapterSite::new("rcv", "rcv", "CC", "GG", "bsai"))
        .unwrap();
    db.add_site(AdapterSite::new("adp2", "adp2", "TGCC", "GCAA", "bsai"))
        .unwrap();
    db.add_base_sequence(
        BaseSequence::new("vecBody", "vecBody", "ACGT", "adp1").with_features(vec![
            Feature::new("body", "misc_feature", 0, 4, Strand::Forward).with_color("#999999"),
        ]),
    )
    .unwrap();
    db.add_base_sequence(BaseSequence::new("body2", "body2", "TTTT", "rcv"))
        .unwrap();
    db.add_backbone(Backbone::new("bb1", "bb1", "vecBody", "adp1"))
        .unwrap();
    db.add_backbone(Backbone::new("bb2", "bb2", "body2", "adp1"))
        .unwrap();
    db.add_backbone(Backbone::new("bb3", "bb3", "body2", "adp2"))
        .unwrap();
    db.add_part(
        Part::leaf("p1", "p1", "ATGC", "bb1").with_features(vec![
            Feature::new("promoter", "promoter", 0, 2, Strand::Forward).with_color("#00ff00"),
            Feature::new("rbs", "RBS", 2, 4, Strand::Reverse).with_color("#0000ff"),
        ]),
    )
    .unwrap();
    db
}

fn snapshot() -> PartsDb {
    snapshot_with(CompositionSettings::default())
}

#[test]
fn backbone_sequence_scenario() {
    let db = snapshot();
    assert_eq!(
        db.backbone_sequence("bb1").unwrap(),
        "TT".to_string() + "GAGACC" + "ACGT" + "GGTCTC" + "AA"
    );
}

#[test]
fn leaf_part_properties() {
    let db = snapshot();
    let p1 = db.part_view("p1").unwrap();
    assert!(p1.is_leaf().unwrap());
    assert_eq!(p1.composed_sequence().unwrap(), "ATGC");
    assert_eq!(p1.level().unwrap(), 0);
    assert_eq!(p1.size().unwrap(), 4);
    assert_eq!(p1.sites().unwrap(), ("AA", "TT"));
    assert_eq!(p1.receiver_sites().unwrap(), ("AA", "TT"));
    assert_eq!(
        p1.full_sequence().unwrap(),
        "ATGC".to_string() + &db.backbone_sequence("bb1").unwrap()
    );
}

#[test]
fn single_child_composite_scenario() {
    let mut db = snapshot();
    db.add_part(Part::composite("p2", "p2", "bb2")).unwrap();
    db.add_edge(PartEdge::new("p2", "p1", 0)).unwrap();
    let p2 = db.part_view("p2").unwrap();
    assert_eq!(p2.receiver_sites().unwrap(), ("CC", "GG"));
    assert_eq!(p2.composed_sequence().unwrap(), "CC".to_string() + "ATGC" + "GG");
    assert_eq!(p2.size().unwrap(), 4);
    assert_eq!(p2.level().unwrap(), 1);
    assert_eq!(p2.children_ids().unwrap(), vec!["p1"]);
}

fn two_child_snapshot() -> PartsDb {
    let mut db = snapshot();
    db.add_part(Part::leaf("p3", "p3", "GATTACA", "bb3")).unwrap();
    db.add_part(Part::composite("p2", "p2", "bb2")).unwrap();
    db.add_edge(PartEdge::new("p2", "p3", 1)).unwrap();
    db.add_edge(PartEdge::new("p2", "p1", 0)).unwrap();
    db
}

#[test]
fn two_child_composite_uses_left_adapter_of_second_child() {
    let db = two_child_snapshot();
    let p2 = db.part_view("p2").unwrap();
    let children = p2.children().unwrap();
    let (r5, r3) = p2.receiver_sites().unwrap();
    let c0 = children[0];
    let c1 = children[1];
    assert_eq!(c0.id(), "p1");
    assert_eq!(c1.id(), "p3");
    let expected = r5.to_string()
        + &c0.composed_sequence().unwrap()
        + c1.sites().unwrap().0
        + &c1.composed_sequence().unwrap()
        + r3;
    assert_eq!(p2.composed_sequence().unwrap(), expected);
    assert_eq!(expected, "CCATGCTGCCGATTACAGG");
    assert_eq!(
        p2.size().unwrap(),
        c0.size().unwrap() + c1.size().unwrap()
    );
}

#[test]
fn reordering_children_changes_sequence_not_size() {
    let db = two_child_snapshot();
    let before = db.part_view("p2").unwrap();
    let seq_before = before.composed_sequence().unwrap();
    let size_before = before.size().unwrap();

    let mut swapped = db.clone();
    for edge in swapped.edges.iter_mut() {
        edge.position = 1 - edge.position;
    }
    let after = swapped.part_view("p2").unwrap();
    assert_ne!(after.composed_sequence().unwrap(), seq_before);
    assert_eq!(after.size().unwrap(), size_before);
    assert_eq!(after.children_ids().unwrap(), vec!["p3", "p1"]);
}

#[test]
fn level_is_one_more_than_deepest_child() {
    let mut db = two_child_snapshot();
    db.add_part(Part::composite("top", "top", "bb2")).unwrap();
    db.add_edge(PartEdge::new("top", "p2", 0)).unwrap();
    db.add_edge(PartEdge::new("top", "p1", 1)).unwrap();
    let top = db.part_view("top").unwrap();
    assert_eq!(top.level().unwrap(), 2);
    assert_eq!(top.size().unwrap(), 4 + 7 + 4);
    let flank_len = top.composed_sequence().unwrap().len() - top.size().unwrap();
    assert!(flank_len > 0);
}

#[test]
fn cycle_fails_instead_of_overflowing() {
    let mut db = snapshot();
    db.add_part(Part::composite("a", "a", "bb2")).unwrap();
    db.add_part(Part::composite("b", "b", "bb2")).unwrap();
    db.add_edge(PartEdge::new("a", "b", 0)).unwrap();
    db.add_edge(PartEdge::new("b", "a", 0)).unwrap();
    let a = db.part_view("a").unwrap();
    assert!(matches!(
        a.composed_sequence(),
        Err(LoopDbError::CycleDetected { .. })
    ));
    assert!(matches!(
        a.full_record(),
        Err(LoopDbError::CycleDetected { .. })
    ));
    assert!(matches!(a.level(), Err(LoopDbError::CycleDetected { .. })));
}

#[test]
fn duplicate_sibling_positions_fail() {
    let mut db = two_child_snapshot();
    db.edges.push(PartEdge::new("p2", "p1", 1));
    let p2 = db.part_view("p2").unwrap();
    match p2.composed_sequence() {
        Err(LoopDbError::DuplicatePosition { parent, position }) => {
            assert_eq!(parent, "p2");
            assert_eq!(position, 1);
        }
        other => panic!("unexpected result {other:?}"),
    }
    assert!(p2.children().is_err());
}

#[test]
fn leaf_without_sequence_fails() {
    let mut db = snapshot();
    db.add_part(Part::composite("empty", "empty", "bb1")).unwrap();
    let empty = db.part_view("empty").unwrap();
    assert!(matches!(
        empty.composed_sequence(),
        Err(LoopDbError::UndefinedSequence { .. })
    ));
    assert!(matches!(
        empty.size(),
        Err(LoopDbError::UndefinedSequence { .. })
    ));
    assert_eq!(empty.level().unwrap(), 0);
}

#[test]
fn composite_without_backbone_fails() {
    let mut db = snapshot();
    db.add_part(Part {
        id: "loose".to_string(),
        name: "loose".to_string(),
        backbone_id: None,
        sequence: None,
        features: vec![],
    })
    .unwrap();
    db.add_edge(PartEdge::new("loose", "p1", 0)).unwrap();
    let loose = db.part_view("loose").unwrap();
    match loose.composed_sequence() {
        Err(LoopDbError::MissingBackbone { part }) => assert_eq!(part, "loose"),
        other => panic!("unexpected result {other:?}"),
    }
    assert!(loose.sites().is_err());
    assert_eq!(loose.size().unwrap(), 4);
}

#[test]
fn record_is_stamped_once_and_keeps_coordinates() {
    let mut db = two_child_snapshot();
    db.settings.description = "Loop level 1".to_string();
    let view = db.part_view("p2").unwrap().record().unwrap().to_view();
    assert_eq!(view.id, "p2");
    assert_eq!(view.name, "p2");
    assert_eq!(view.description, "Loop level 1");
    assert_eq!(view.sequence, "CCATGCTGCCGATTACAGG");
    assert_eq!(view.features.len(), 2);
    assert_eq!((view.features[0].start, view.features[0].end), (0, 2));
    assert_eq!(view.features[1].strand, Strand::Reverse);
    assert_eq!((view.features[1].start, view.features[1].end), (2, 4));
}

#[test]
fn shifted_coordinates_follow_the_payload() {
    let db = snapshot_with(CompositionSettings {
        feature_coordinates: FeatureCoordinates::Shifted,
        ..CompositionSettings::default()
    });
    let mut db = db;
    db.add_part(Part::composite("p2", "p2", "bb1")).unwrap();
    db.add_edge(PartEdge::new("p2", "p1", 0)).unwrap();
    let view = db.part_view("p2").unwrap().full_record().unwrap().to_view();
    // "AA" precedes p1; the backbone body follows "AAATGCTT" + "TT" + "GAGACC"
    assert_eq!((view.features[0].start, view.features[0].end), (2, 4));
    assert_eq!((view.features[1].start, view.features[1].end), (4, 6));
    assert_eq!(view.features[2].label, "body");
    assert_eq!((view.features[2].start, view.features[2].end), (16, 20));
    for feature in &view.features {
        assert!(feature.end as usize <= view.sequence.len());
    }
}

#[test]
fn full_record_appends_backbone() {
    let db = snapshot();
    let p1 = db.part_view("p1").unwrap();
    let record = p1.full_record().unwrap();
    assert_eq!(record.get_forward_string(), p1.full_sequence().unwrap());
    assert!(!record.is_circular());
    let view = record.to_view();
    assert_eq!(view.id, "p1");
    assert_eq!(view.description, "Generated by LoopDB");
    let labels: Vec<&str> = view.features.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, vec!["promoter", "rbs", "body"]);
    assert_eq!((view.features[2].start, view.features[2].end), (0, 4));
}

#[test]
fn full_record_can_be_circular() {
    let db = snapshot_with(CompositionSettings {
        circular_full_record: true,
        ..CompositionSettings::default()
    });
    let record = db.part_view("p1").unwrap().full_record().unwrap();
    assert!(record.is_circular());
}

#[test]
fn full_record_rejects_non_dna() {
    let mut db = snapshot();
    db.add_part(Part::leaf("odd", "odd", "ATGN", "bb1")).unwrap();
    let odd = db.part_view("odd").unwrap();
    assert_eq!(odd.composed_sequence().unwrap(), "ATGN");
    match odd.full_record() {
        Err(LoopDbError::InvalidAlphabet {
            entity,
            base,
            offset,
        }) => {
            assert!(entity.contains("odd"));
            assert_eq!(base, 'N');
            assert_eq!(offset, 3);
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn shared_child_under_two_parents() {
    let mut db = snapshot();
    db.add_part(Part::composite("x", "x", "bb2")).unwrap();
    db.add_part(Part::composite("y", "y", "bb2")).unwrap();
    db.add_edge(PartEdge::new("x", "p1", 0)).unwrap();
    db.add_edge(PartEdge::new("y", "p1", 0)).unwrap();
    db.add_edge(PartEdge::new("y", "x", 1)).unwrap();
    let y = db.part_view("y").unwrap();
    assert_eq!(
        y.composed_sequence().unwrap(),
        "CC".to_string() + "ATGC" + "AA" + "CCATGCGG" + "GG"
    );
    assert!(db.validate().is_ok());
    let parents: Vec<&str> = db.parents_of("p1").iter().map(|p| p.id.as_str()).collect();
    assert_eq!(parents, vec!["x", "y"]);
}

#[test]
fn record_view_serializes_to_contract() {
    let db = snapshot();
    let view = db.part_view("p1").unwrap().record().unwrap().to_view();
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["id"], "p1");
    assert_eq!(json["sequence"], "ATGC");
    assert_eq!(json["features"][1]["strand"], -1);
    assert_eq!(json["features"][1]["type"], "RBS");
    assert_eq!(json["features"][0]["color"], "#00ff00");
}
