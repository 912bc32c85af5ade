//! Nodes of the materials browse tree.

use std::fmt;

use super::Department;
use super::Exam;
use super::School;
use super::University;

/// Academic years assumed for a department that does not say.
pub const DEFAULT_YEARS: u32 = 4;

/// The level a node sits at in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    University,
    School,
    Department,
    Year,
    Semester,
    Material,
}

impl NodeKind {
    /// Returns the lowercase wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::University => "university",
            Self::School => "school",
            Self::Department => "department",
            Self::Year => "year",
            Self::Semester => "semester",
            Self::Material => "material",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of a [`TreeNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    University,
    School {
        description: Option<String>,
    },
    Department {
        years: Option<u32>,
        description: Option<String>,
    },
    /// Synthetic, derived from the parent department's year count.
    Year { department_id: String },
    /// Synthetic, always two per year.
    Semester {
        department_id: String,
        /// Numeric year parsed from the parent year's label.
        year: Option<u32>,
        semester: u8,
    },
    Material {
        url: Option<String>,
    },
}

/// One entry of the browse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Unique among its siblings; server ids for real entities.
    pub id: String,
    /// Display label.
    pub name: String,
    pub data: NodeData,
}

impl TreeNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, data: NodeData) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data,
        }
    }

    /// Returns the level of this node.
    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::University => NodeKind::University,
            NodeData::School { .. } => NodeKind::School,
            NodeData::Department { .. } => NodeKind::Department,
            NodeData::Year { .. } => NodeKind::Year,
            NodeData::Semester { .. } => NodeKind::Semester,
            NodeData::Material { .. } => NodeKind::Material,
        }
    }

    /// Returns `true` for terminal nodes, which are never expandable.
    pub fn is_leaf(&self) -> bool {
        matches!(self.data, NodeData::Material { .. })
    }

    /// Returns `true` for client-side year/semester nodes.
    pub fn is_synthetic(&self) -> bool {
        matches!(self.data, NodeData::Year { .. } | NodeData::Semester { .. })
    }

    /// Returns the school or department description.
    pub fn description(&self) -> Option<&str> {
        match &self.data {
            NodeData::School { description } | NodeData::Department { description, .. } => {
                description.as_deref().filter(|d| !d.is_empty())
            }
            _ => None,
        }
    }

    /// Returns the file URL of a material.
    pub fn url(&self) -> Option<&str> {
        match &self.data {
            NodeData::Material { url } => url.as_deref(),
            _ => None,
        }
    }
}

impl From<University> for TreeNode {
    fn from(university: University) -> Self {
        Self::new(university.id, university.name, NodeData::University)
    }
}

impl From<School> for TreeNode {
    fn from(school: School) -> Self {
        Self::new(
            school.id,
            school.name,
            NodeData::School {
                description: school.description,
            },
        )
    }
}

impl From<Department> for TreeNode {
    fn from(department: Department) -> Self {
        Self::new(
            department.id,
            department.name,
            NodeData::Department {
                years: department.years,
                description: department.description,
            },
        )
    }
}

impl From<Exam> for TreeNode {
    fn from(exam: Exam) -> Self {
        Self::new(exam.id, exam.title, NodeData::Material { url: exam.file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_materials_are_leaves() {
        let material = TreeNode::from(Exam {
            id: "e1".into(),
            title: "Midterm".into(),
            file: Some("https://files/e1.pdf".into()),
        });
        assert!(material.is_leaf());
        assert_eq!(material.kind(), NodeKind::Material);
        assert_eq!(material.url(), Some("https://files/e1.pdf"));

        let university = TreeNode::from(University {
            id: "u1".into(),
            name: "Test University".into(),
        });
        assert!(!university.is_leaf());
        assert_eq!(university.kind().to_string(), "university");
    }

    #[test]
    fn test_empty_description_is_hidden() {
        let school = TreeNode::from(School {
            id: "s1".into(),
            name: "Engineering".into(),
            description: Some(String::new()),
        });
        assert_eq!(school.description(), None);
    }
}
