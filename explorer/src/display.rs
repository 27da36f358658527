//! Console formatting for explorer output.

use graphloom_graph::explore::{
    Direction, DuplicateRel, GraphSummary, NeighborEntry, NodeDetails, PathHit, SearchHit,
};
use std::collections::BTreeMap;

pub fn display_summary(summary: &GraphSummary) {
    println!("\n📊 Graph Summary");
    println!("\nTotal Nodes: {}", summary.node_count);
    println!("Total Relationships: {}", summary.relationship_count);

    println!("\n🏷️ Node Labels (Count):");
    for label in &summary.labels {
        println!("- {}: {}", label.label, label.count);
    }

    println!("\n🔗 Relationship Types (Count):");
    for rel in &summary.relationship_types {
        println!("- {}: {}", rel.rel_type, rel.count);
    }
}

pub fn display_node(node: &NodeDetails) {
    println!("\n📌 Node: {}", node.id);
    println!("🏷️  Labels: {}", node.labels.join(", "));
    println!("🔍 Properties:");
    for (key, value) in &node.properties {
        println!("  - {}: {}", key, value);
    }
}

pub fn display_relationships(relationships: &BTreeMap<String, Vec<NeighborEntry>>) {
    println!("\n🔗 Relationships:");
    for (rel_type, neighbors) in relationships {
        println!("\n[{}]", rel_type);
        for neighbor in neighbors {
            let arrow = match neighbor.direction {
                Direction::Outgoing => "→",
                Direction::Incoming => "←",
            };
            println!(
                "  {} {} ({})",
                arrow,
                neighbor.target,
                neighbor.target_labels.join(", ")
            );
        }
    }
}

pub fn display_path(path: &PathHit) {
    println!("\n🛣️ Path:");
    for (i, node) in path.nodes.iter().enumerate() {
        println!("{}. {} ({})", i + 1, node.id, node.labels.join(", "));
        if let Some(rel) = path.relationships.get(i) {
            println!("   --[{}]-->", rel.rel_type);
        }
    }
}

pub fn display_duplicates(duplicates: &[DuplicateRel]) {
    if duplicates.is_empty() {
        println!("\nNo duplicate relationships found.");
        return;
    }
    println!("\n⚠️ Potential Duplicate Relationships:");
    for dup in duplicates {
        println!("\n{} --[{}]--> {}", dup.source, dup.rel_type, dup.target);
        println!("Count: {}", dup.count);
    }
}

pub fn display_search_results(results: &[SearchHit]) {
    if results.is_empty() {
        println!("\nNo nodes found matching your search.");
        return;
    }

    println!("\n🔍 Search Results:");
    for (i, hit) in results.iter().enumerate() {
        let term_info = if hit.matched_terms.is_empty() {
            String::new()
        } else {
            format!(" (matched: {})", hit.matched_terms.join(", "))
        };
        println!(
            "{}. {} ({}){}",
            i + 1,
            hit.id,
            hit.labels.join(", "),
            term_info
        );
    }
}
