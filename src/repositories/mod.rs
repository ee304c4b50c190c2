pub mod category_repository;
pub mod exam_repository;
pub mod question_repository;

pub use category_repository::{CategoryRepository, MongoCategoryRepository};
pub use exam_repository::{ExamRepository, MongoExamRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
