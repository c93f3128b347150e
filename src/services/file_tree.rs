//! 文件树构建
//!
//! 把共享同一前缀的扁平对象列表折叠成有序的目录/文件森林。
//! 纯函数：无副作用，结果与输入顺序无关。

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::object_store::ObjectRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Folder,
    File,
}

/// 树节点，派生视图，从不持久化
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTreeNode {
    pub name: String,
    /// 相对前缀的完整路径
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileTreeNode>>,
}

#[derive(Debug, Clone, Copy)]
struct FileMeta {
    size: Option<i64>,
    last_modified: Option<DateTime<Utc>>,
}

/// 中间聚合结构。BTreeMap 保证同层字典序且合并天然幂等。
#[derive(Default)]
struct FolderAcc {
    folders: BTreeMap<String, FolderAcc>,
    files: BTreeMap<String, FileMeta>,
}

/// 从对象列表构建文件树
///
/// - 前缀本身（相对路径为空）的对象跳过
/// - 中间段生成目录节点，末段生成文件节点，重复路径合并
/// - 每层排序：目录在前，文件在后；同类按名称区分大小写字典序
pub fn build_file_tree(objects: &[ObjectRecord], prefix: &str) -> Vec<FileTreeNode> {
    let mut root = FolderAcc::default();

    for object in objects {
        let Some(relative) = object.key.strip_prefix(prefix) else {
            continue;
        };
        let parts: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
        let Some((file_name, folder_parts)) = parts.split_last() else {
            continue;
        };

        let mut current = &mut root;
        for part in folder_parts {
            current = current.folders.entry(part.to_string()).or_default();
        }
        current.files.entry(file_name.to_string()).or_insert(FileMeta {
            size: object.size,
            last_modified: object.last_modified,
        });
    }

    emit_children(root, "")
}

fn emit_children(acc: FolderAcc, base: &str) -> Vec<FileTreeNode> {
    let mut nodes = Vec::with_capacity(acc.folders.len() + acc.files.len());

    for (name, folder) in acc.folders {
        let path = format!("{}{}", base, name);
        let child_base = format!("{}/", path);
        nodes.push(FileTreeNode {
            name,
            node_type: NodeType::Folder,
            size: None,
            last_modified: None,
            children: Some(emit_children(folder, &child_base)),
            path,
        });
    }

    for (name, meta) in acc.files {
        nodes.push(FileTreeNode {
            path: format!("{}{}", base, name),
            name,
            node_type: NodeType::File,
            size: meta.size,
            last_modified: meta.last_modified,
            children: None,
        });
    }

    nodes
}
