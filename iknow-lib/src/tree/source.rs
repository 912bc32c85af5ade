//! Data source seam for the tree controller.

use async_trait::async_trait;

use crate::IKnowClient;
use crate::error::Error;
use crate::model::Department;
use crate::model::Exam;
use crate::model::School;
use crate::model::University;

/// The four fetches the tree needs. [`IKnowClient`] is the production
/// implementation.
#[async_trait]
pub trait ChildSource: Send + Sync {
    /// Root level, first page only.
    async fn universities(&self) -> Result<Vec<University>, Error>;

    /// All schools of a university, across pages.
    async fn schools(&self, university_id: &str) -> Result<Vec<School>, Error>;

    async fn departments(&self, school_id: &str) -> Result<Vec<Department>, Error>;

    async fn exams(&self, department_id: &str, year: u32, semester: u8) -> Result<Vec<Exam>, Error>;
}

#[async_trait]
impl ChildSource for IKnowClient {
    async fn universities(&self) -> Result<Vec<University>, Error> {
        IKnowClient::universities(self).await
    }

    async fn schools(&self, university_id: &str) -> Result<Vec<School>, Error> {
        IKnowClient::schools(self, university_id).await
    }

    async fn departments(&self, school_id: &str) -> Result<Vec<Department>, Error> {
        self.department_tree(school_id).await
    }

    async fn exams(&self, department_id: &str, year: u32, semester: u8) -> Result<Vec<Exam>, Error> {
        IKnowClient::exams(self, department_id, year, semester).await
    }
}
