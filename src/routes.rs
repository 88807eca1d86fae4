//! Route-tree building for site navigation.
//!
//! A pure transform from flat route paths ("bio", "photos/tokyo") into a
//! nested tree, and from the tree into the flat, depth-annotated list the
//! navigation component renders. Dynamic segments (anything in square
//! brackets) are not navigable and are filtered out up front.
//!
//! `BTreeMap` keeps siblings in deterministic name order, so the rendered
//! navigation is stable across runs.

use std::collections::BTreeMap;

/// A route to include in navigation. `path` is slash-separated with no
/// leading slash; `name` overrides the display name of the leaf segment.
#[derive(Debug, Clone)]
pub struct RouteDef {
    pub path: String,
    pub name: Option<String>,
}

impl RouteDef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
        }
    }

    pub fn named(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: Some(name.into()),
        }
    }
}

/// A node in the route tree. Intermediate segments exist as non-page nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNode {
    pub name: String,
    pub path: String,
    pub href: String,
    pub children: BTreeMap<String, RouteNode>,
    pub is_page: bool,
}

/// Flattened navigation entry: depth-first order, pages only.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRoute {
    pub href: String,
    pub name: String,
    pub path: String,
    pub depth: usize,
}

/// Build the route tree from route definitions.
pub fn routes_tree(defs: &[RouteDef]) -> BTreeMap<String, RouteNode> {
    let mut tree: BTreeMap<String, RouteNode> = BTreeMap::new();

    for def in defs {
        if def.path.contains('[') {
            continue;
        }
        let segments: Vec<&str> = def.path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            continue;
        }

        let mut level = &mut tree;
        for (index, segment) in segments.iter().enumerate() {
            let is_leaf = index == segments.len() - 1;
            let joined = segments[..=index].join("/");
            let node = level.entry(segment.to_string()).or_insert_with(|| RouteNode {
                name: segment.to_string(),
                path: joined.clone(),
                href: format!("/{joined}"),
                children: BTreeMap::new(),
                is_page: false,
            });
            if is_leaf {
                node.is_page = true;
                if let Some(name) = &def.name {
                    node.name = name.clone();
                }
            }
            level = &mut node.children;
        }
    }

    tree
}

/// Flatten the tree for rendering: page nodes only, depth-first, display
/// names capitalized on the first letter.
pub fn flatten_routes(tree: &BTreeMap<String, RouteNode>) -> Vec<FlatRoute> {
    let mut flat = Vec::new();
    for node in tree.values() {
        walk(node, 0, &mut flat);
    }
    flat
}

fn walk(node: &RouteNode, depth: usize, flat: &mut Vec<FlatRoute>) {
    if node.is_page {
        flat.push(FlatRoute {
            href: node.href.clone(),
            name: capitalize(&node.name),
            path: node.path.clone(),
            depth,
        });
    }
    for child in node.children.values() {
        walk(child, depth + 1, flat);
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs(paths: &[&str]) -> Vec<RouteDef> {
        paths.iter().map(|p| RouteDef::new(*p)).collect()
    }

    #[test]
    fn builds_nested_tree() {
        let tree = routes_tree(&defs(&["bio", "photos", "photos/tokyo"]));
        assert_eq!(tree.len(), 2);
        let photos = &tree["photos"];
        assert!(photos.is_page);
        assert_eq!(photos.href, "/photos");
        assert_eq!(photos.children["tokyo"].path, "photos/tokyo");
        assert_eq!(photos.children["tokyo"].href, "/photos/tokyo");
    }

    #[test]
    fn dynamic_segments_are_excluded() {
        let tree = routes_tree(&defs(&["photos", "photos/[slug]"]));
        assert!(tree["photos"].children.is_empty());
    }

    #[test]
    fn intermediate_segments_are_not_pages() {
        let tree = routes_tree(&defs(&["photos/tokyo"]));
        assert!(!tree["photos"].is_page);
        assert!(tree["photos"].children["tokyo"].is_page);
    }

    #[test]
    fn later_definition_marks_existing_node_as_page() {
        let tree = routes_tree(&defs(&["photos/tokyo", "photos"]));
        assert!(tree["photos"].is_page);
    }

    #[test]
    fn flatten_capitalizes_and_tracks_depth() {
        let tree = routes_tree(&defs(&["bio", "photos", "photos/tokyo"]));
        let flat = flatten_routes(&tree);
        assert_eq!(
            flat.iter().map(|r| (r.name.as_str(), r.depth)).collect::<Vec<_>>(),
            vec![("Bio", 0), ("Photos", 0), ("Tokyo", 1)]
        );
    }

    #[test]
    fn flatten_skips_non_page_intermediates() {
        let tree = routes_tree(&defs(&["photos/tokyo"]));
        let flat = flatten_routes(&tree);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].href, "/photos/tokyo");
        assert_eq!(flat[0].depth, 1);
    }

    #[test]
    fn display_name_override() {
        let tree = routes_tree(&[RouteDef::named("photos/rainy-week", "Rainy Week")]);
        let flat = flatten_routes(&tree);
        assert_eq!(flat[0].name, "Rainy Week");
    }

    #[test]
    fn empty_and_root_paths_are_ignored() {
        let tree = routes_tree(&defs(&["", "/"]));
        assert!(tree.is_empty());
    }
}
