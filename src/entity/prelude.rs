//! 预导入模块，方便使用

pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::rubrics::{
    ActiveModel as RubricActiveModel, Entity as Rubrics, Model as RubricModel,
};
pub use super::submission_versions::{
    ActiveModel as SubmissionVersionActiveModel, Entity as SubmissionVersions,
    Model as SubmissionVersionModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
