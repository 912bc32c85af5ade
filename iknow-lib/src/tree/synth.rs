//! Client-side year and semester levels.

use crate::model::DEFAULT_YEARS;
use crate::model::NodeData;
use crate::model::TreeNode;

/// Every year has exactly this many semesters.
pub const SEMESTERS_PER_YEAR: u8 = 2;

/// Largest year count taken from the server; anything above falls back to
/// [`DEFAULT_YEARS`].
pub const MAX_YEARS: u32 = 12;

/// Extracts the numeric year from a label such as `"Year 2"`.
///
/// All ASCII digits in the label are concatenated; `None` when there are none.
pub fn year_from_label(label: &str) -> Option<u32> {
    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Synthesizes the year children of a department.
///
/// Returns nothing for any other kind of node.
pub fn year_nodes(department: &TreeNode) -> Vec<TreeNode> {
    let NodeData::Department { years, .. } = &department.data else {
        return Vec::new();
    };
    let years = match *years {
        Some(n) if n > MAX_YEARS => {
            log::warn!(
                "department {} reports {} years, using {}",
                department.id,
                n,
                DEFAULT_YEARS
            );
            DEFAULT_YEARS
        }
        Some(n) if n > 0 => n,
        _ => DEFAULT_YEARS,
    };

    (1..=years)
        .map(|n| {
            TreeNode::new(
                format!("{}-year{}", department.id, n),
                format!("Year {n}"),
                NodeData::Year {
                    department_id: department.id.clone(),
                },
            )
        })
        .collect()
}

/// Synthesizes the two semester children of a year.
///
/// Returns nothing for any other kind of node.
pub fn semester_nodes(year: &TreeNode) -> Vec<TreeNode> {
    let NodeData::Year { department_id } = &year.data else {
        return Vec::new();
    };
    let year_number = year_from_label(&year.name);

    (1..=SEMESTERS_PER_YEAR)
        .map(|semester| {
            TreeNode::new(
                format!("{}-sem{}", year.id, semester),
                format!("Semester {semester}"),
                NodeData::Semester {
                    department_id: department_id.clone(),
                    year: year_number,
                    semester,
                },
            )
        })
        .collect()
}
