use crate::weights::algorithm_weight;
use pqc_scan_core::{HeatmapNode, HeatmapNodeType, SastReport, ScanConfig};
use std::collections::HashMap;
use std::path::Path;
use walkdir::WalkDir;

/// Build the risk tree over the working copy. File leaves carry the summed
/// weighted risk of their SAST findings (capped at 10); directory scores
/// are the maximum over their children, 0 when empty.
pub fn build_heatmap(
    repo_path: &Path,
    sast_report: &SastReport,
    config: &ScanConfig,
) -> HeatmapNode {
    let file_risk = per_file_risk(sast_report);

    let root_name = repo_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string());
    let mut root = HeatmapNode::dir(root_name, "");

    let walker = WalkDir::new(repo_path).into_iter().filter_entry(|entry| {
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !(entry.file_type().is_dir()
            && config.classifier.ignore_directories.iter().any(|d| d == &*name))
    });

    for entry in walker.flatten() {
        if entry.depth() == 0 {
            continue;
        }
        let rel_path = entry
            .path()
            .strip_prefix(repo_path)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            insert_dir(&mut root, &rel_path);
        } else if entry.file_type().is_file() {
            let risk = file_risk.get(rel_path.as_str()).copied().unwrap_or(0.0);
            attach_file(&mut root, &rel_path, risk.min(10.0));
        }
    }

    propagate(&mut root);
    root
}

fn per_file_risk(sast_report: &SastReport) -> HashMap<String, f64> {
    let mut risk: HashMap<String, f64> = HashMap::new();
    for result in sast_report.detailed_results.iter().filter(|r| !r.skipped) {
        for vuln in &result.vulnerabilities {
            *risk.entry(result.file_path.clone()).or_default() +=
                vuln.severity.weight() * algorithm_weight(&vuln.algorithm);
        }
    }
    risk
}

/// Find or create the directory node for a relative path.
fn ensure_dir<'a>(root: &'a mut HeatmapNode, rel_path: &str) -> &'a mut HeatmapNode {
    let mut node = root;
    let mut walked = String::new();
    for component in rel_path.split('/') {
        if !walked.is_empty() {
            walked.push('/');
        }
        walked.push_str(component);

        let position = node
            .children
            .iter()
            .position(|child| child.node_type == HeatmapNodeType::Dir && child.path == walked);
        let index = match position {
            Some(index) => index,
            None => {
                node.children
                    .push(HeatmapNode::dir(component, walked.clone()));
                node.children.len() - 1
            }
        };
        node = &mut node.children[index];
    }
    node
}

fn insert_dir(root: &mut HeatmapNode, rel_path: &str) {
    ensure_dir(root, rel_path);
}

fn attach_file(root: &mut HeatmapNode, rel_path: &str, risk: f64) {
    let (parent, name) = match rel_path.rsplit_once('/') {
        Some((parent, name)) => (Some(parent), name),
        None => (None, rel_path),
    };
    let node = match parent {
        Some(parent) => ensure_dir(root, parent),
        None => root,
    };
    node.children.push(HeatmapNode::file(name, rel_path, risk));
}

/// Bottom-up: every directory's risk is the maximum over its children.
fn propagate(node: &mut HeatmapNode) {
    if node.node_type == HeatmapNodeType::File {
        return;
    }
    for child in &mut node.children {
        propagate(child);
    }
    node.risk_score = node
        .children
        .iter()
        .map(|child| child.risk_score)
        .fold(0.0, f64::max);
}
