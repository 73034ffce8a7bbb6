use cartogephi::{Error, ExtractOptions, IndexEntry, SearchKey, process};

fn gexf(nodes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gexf xmlns="http://gexf.net/1.3" xmlns:viz="http://gexf.net/1.3/viz" version="1.3">
  <graph defaultedgetype="undirected">
    <attributes class="node">
      <attribute id="modularityclasses" title="Modularity Class" type="integer"/>
      <attribute id="code" title="Code" type="string"/>
    </attributes>
    <nodes>
{nodes}
    </nodes>
    <edges>
      <edge id="0" source="a" target="b">
        <attvalues><attvalue for="modularityclasses" value="99"/></attvalues>
        <viz:color r="1" g="1" b="1"/>
      </edge>
    </edges>
  </graph>
</gexf>"#
    )
}

fn node(id: &str, label: &str, cluster: Option<&str>, xy: Option<(f64, f64)>) -> String {
    let mut s = format!(r#"<node id="{id}" label="{label}"><attvalues>"#);
    if let Some(c) = cluster {
        s.push_str(&format!(r#"<attvalue for="modularityclasses" value="{c}"/>"#));
    }
    s.push_str("</attvalues>");
    if let Some((x, y)) = xy {
        s.push_str(&format!(r#"<viz:position x="{x}" y="{y}" z="0.0"/>"#));
    }
    s.push_str("</node>\n");
    s
}

#[test]
fn extract_indexes_by_id_by_default() {
    let doc = gexf(&[
        node("a", "Alpha", Some("0"), Some((1.0, 2.0))),
        node("b", "Beta", Some("0"), Some((-3.0, 8.5))),
    ]
    .concat());
    let state = process(doc.as_bytes(), &ExtractOptions::default()).unwrap();

    assert_eq!(state.index.len(), 2);
    assert_eq!(
        state.index.get(&Some("b".to_string())),
        Some(&IndexEntry {
            x: -3.0,
            y: 8.5,
            label: "Beta".to_string()
        })
    );
    assert_eq!(state.bounds.x.min, -3.0);
    assert_eq!(state.bounds.x.max, 1.0);
    assert_eq!(state.bounds.y.min, 2.0);
    assert_eq!(state.bounds.y.max, 8.5);
}

#[test]
fn extract_stores_cluster_points_as_y_x() {
    let doc = gexf(&[
        node("a", "A", Some("3"), Some((1.0, 2.0))),
        node("b", "B", Some("3"), Some((5.0, 6.0))),
        node("c", "C", Some("4"), Some((7.0, 8.0))),
    ]
    .concat());
    let state = process(doc.as_bytes(), &ExtractOptions::default()).unwrap();

    assert_eq!(
        state.cluster_points.get(&Some("3".to_string())),
        Some(&vec![[2.0, 1.0], [6.0, 5.0]])
    );
    assert_eq!(
        state.cluster_points.get(&Some("4".to_string())),
        Some(&vec![[8.0, 7.0]])
    );
    // Edge attvalues never leak into node clusters.
    assert!(!state.cluster_points.contains_key(&Some("99".to_string())));
}

#[test]
fn extract_by_label_uses_label_as_key() {
    let doc = gexf(&node("a", "Alpha", None, Some((0.0, 0.0))));
    let options = ExtractOptions {
        search_key: SearchKey::Label,
        ..Default::default()
    };
    let state = process(doc.as_bytes(), &options).unwrap();
    assert!(state.index.contains_key(&Some("Alpha".to_string())));
}

#[test]
fn extract_by_attribute_reads_attvalue() {
    let doc = gexf(
        r#"<node id="a" label="Alpha">
             <attvalues>
               <attvalue for="code" value="FR-75"/>
               <attvalue for="modularityclasses" value="1"/>
             </attvalues>
             <viz:position x="4" y="5"/>
           </node>"#,
    );
    let options = ExtractOptions {
        search_key: "code".parse().unwrap(),
        ..Default::default()
    };
    let state = process(doc.as_bytes(), &options).unwrap();
    assert_eq!(
        state.index.get(&Some("FR-75".to_string())).map(|e| e.label.as_str()),
        Some("Alpha")
    );
}

#[test]
fn extract_attribute_key_missing_indexes_under_unset() {
    let doc = gexf(&node("a", "Alpha", Some("1"), Some((4.0, 5.0))));
    let options = ExtractOptions {
        search_key: SearchKey::Attribute("code".to_string()),
        ..Default::default()
    };
    let state = process(doc.as_bytes(), &options).unwrap();
    assert!(state.index.contains_key(&None));
}

#[test]
fn extract_custom_modularity_attribute() {
    let doc = gexf(
        r#"<node id="a" label="A">
             <attvalues><attvalue for="community" value="north"/></attvalues>
             <viz:position x="1" y="1"/>
           </node>"#,
    );
    let options = ExtractOptions {
        modularity_attribute: "community".to_string(),
        ..Default::default()
    };
    let state = process(doc.as_bytes(), &options).unwrap();
    assert_eq!(state.cluster_points.len(), 1);
    assert!(state.cluster_points.contains_key(&Some("north".to_string())));
}

#[test]
fn extract_node_without_cluster_lands_in_unset_cluster() {
    let doc = gexf(&node("a", "A", None, Some((1.0, 2.0))));
    let state = process(doc.as_bytes(), &ExtractOptions::default()).unwrap();
    assert!(state.index.contains_key(&Some("a".to_string())));
    assert_eq!(state.cluster_points.get(&None), Some(&vec![[2.0, 1.0]]));
}

#[test]
fn extract_duplicate_search_key_keeps_last() {
    let doc = gexf(&[
        node("dup", "First", Some("0"), Some((1.0, 1.0))),
        node("other", "Other", Some("0"), Some((0.0, 0.0))),
        node("dup", "Second", Some("0"), Some((9.0, 7.0))),
    ]
    .concat());
    let state = process(doc.as_bytes(), &ExtractOptions::default()).unwrap();
    assert_eq!(state.index.len(), 2);
    assert_eq!(
        state.index.get(&Some("dup".to_string())),
        Some(&IndexEntry {
            x: 9.0,
            y: 7.0,
            label: "Second".to_string()
        })
    );
    // Overwriting keeps the original insertion slot.
    assert_eq!(
        state.index.get_index_of(&Some("dup".to_string())),
        Some(0)
    );
}

#[test]
fn extract_first_cluster_color_wins() {
    let doc = gexf(
        r#"<node id="a" label="A">
             <attvalues><attvalue for="modularityclasses" value="0"/></attvalues>
             <viz:color r="0.1" g="0.2" b="0.3"/>
             <viz:position x="0" y="0"/>
           </node>
           <node id="b" label="B">
             <attvalues><attvalue for="modularityclasses" value="0"/></attvalues>
             <viz:color r="200" g="100" b="50"/>
             <viz:position x="1" y="1"/>
           </node>"#,
    );
    let state = process(doc.as_bytes(), &ExtractOptions::default()).unwrap();
    let color = state.cluster_colors[&Some("0".to_string())];
    assert_eq!(color[0].to_bits(), 0.1f64.to_bits());
    assert_eq!(color[1].to_bits(), 0.2f64.to_bits());
    assert_eq!(color[2].to_bits(), 0.3f64.to_bits());
}

#[test]
fn extract_color_before_cluster_goes_to_unset() {
    let doc = gexf(
        r#"<node id="a" label="A">
             <viz:color r="1" g="2" b="3"/>
             <attvalues><attvalue for="modularityclasses" value="5"/></attvalues>
             <viz:position x="0" y="0"/>
           </node>"#,
    );
    let state = process(doc.as_bytes(), &ExtractOptions::default()).unwrap();
    assert_eq!(state.cluster_colors.get(&None), Some(&[1.0, 2.0, 3.0]));
    assert!(!state.cluster_colors.contains_key(&Some("5".to_string())));
}

#[test]
fn extract_node_without_position_is_dropped_silently() {
    let doc = gexf(&[
        node("ghost", "Ghost", Some("7"), None),
        node("a", "A", Some("0"), Some((1.0, 1.0))),
    ]
    .concat());
    let state = process(doc.as_bytes(), &ExtractOptions::default()).unwrap();
    assert!(!state.index.contains_key(&Some("ghost".to_string())));
    assert!(!state.cluster_points.contains_key(&Some("7".to_string())));
    assert_eq!(state.bounds.x.min, 1.0);
    assert_eq!(state.dropped_nodes, 1);
}

#[test]
fn extract_rejects_malformed_document() {
    let doc = r#"<gexf><graph><nodes><node id="a" label="A"></nodes></graph></gexf>"#;
    let err = process(doc.as_bytes(), &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, Error::MalformedDocument { .. }), "{err}");
}

#[test]
fn extract_rejects_truncated_document() {
    let doc = gexf(&node("a", "A", Some("0"), Some((1.0, 1.0))));
    let truncated = &doc[..doc.len() / 2];
    let err = process(truncated.as_bytes(), &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, Error::MalformedDocument { .. }), "{err}");
}

#[test]
fn extract_nested_node_keeps_outer_record_open() {
    let doc = gexf(
        r#"<node id="g" label="Group">
             <attvalues><attvalue for="modularityclasses" value="outer"/></attvalues>
             <nodes>
               <node id="a" label="Inner">
                 <attvalues><attvalue for="modularityclasses" value="inner"/></attvalues>
                 <viz:position x="1" y="1"/>
               </node>
             </nodes>
             <viz:position x="5" y="5"/>
           </node>"#,
    );
    let state = process(doc.as_bytes(), &ExtractOptions::default()).unwrap();
    assert_eq!(state.dropped_nodes, 0);
    assert_eq!(
        state.index.get(&Some("g".to_string())),
        Some(&IndexEntry {
            x: 5.0,
            y: 5.0,
            label: "Group".to_string()
        })
    );
    assert_eq!(
        state.cluster_points.get(&Some("outer".to_string())),
        Some(&vec![[5.0, 5.0]])
    );
    assert_eq!(
        state.cluster_points.get(&Some("inner".to_string())),
        Some(&vec![[1.0, 1.0]])
    );
}
