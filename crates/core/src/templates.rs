//! Built-in folder templates offered at collection creation.
//!
//! Each template bundles a ready-made schema with a few example items
//! that are seeded as real records when the user opts in. Example item
//! keys match the schema field names, and the data is kept valid
//! against the schema; a test pins that.

use serde_json::{json, Value};

use crate::model::RecordData;
use crate::schema::{Field, FieldType, Schema};

/// A themed group of templates shown as one tab in the picker.
#[derive(Debug, Clone)]
pub struct TemplateCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub templates: Vec<FolderTemplate>,
}

/// One ready-made folder definition.
#[derive(Debug, Clone)]
pub struct FolderTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub schema: Schema,
    pub example_items: Vec<RecordData>,
}

/// Look up a template by category and template id.
pub fn find(category_id: &str, template_id: &str) -> Option<FolderTemplate> {
    catalog()
        .into_iter()
        .find(|c| c.id == category_id)?
        .templates
        .into_iter()
        .find(|t| t.id == template_id)
}

/// The full built-in catalog.
pub fn catalog() -> Vec<TemplateCategory> {
    vec![
        TemplateCategory {
            id: "student",
            name: "Student",
            templates: vec![assignments(), exams(), study_notes()],
        },
        TemplateCategory {
            id: "business",
            name: "Business",
            templates: vec![orders(), customers(), expenses()],
        },
        TemplateCategory {
            id: "personal",
            name: "Personal",
            templates: vec![projects(), tasks(), goals()],
        },
    ]
}

fn item(pairs: &[(&str, Value)]) -> RecordData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn assignments() -> FolderTemplate {
    FolderTemplate {
        id: "assignments",
        name: "Assignments",
        description: "Track your homework and assignments",
        schema: Schema::new(vec![
            Field::new("subject", "Subject", FieldType::Text).required(),
            Field::new("title", "Title", FieldType::Text).required(),
            Field::new("status", "Status", FieldType::Select)
                .required()
                .with_options(["Pending", "In Progress", "Completed"]),
            Field::new("deadline", "Deadline", FieldType::Date),
            Field::new("notes", "Notes", FieldType::Textarea),
        ]),
        example_items: vec![
            item(&[
                ("subject", json!("Database Management")),
                ("title", json!("SQL Assignment")),
                ("status", json!("Completed")),
                ("deadline", json!("2024-01-20")),
                ("notes", json!("Practice queries on employee database")),
            ]),
            item(&[
                ("subject", json!("Operating Systems")),
                ("title", json!("Process Scheduling Lab")),
                ("status", json!("Pending")),
                ("deadline", json!("2024-01-25")),
                ("notes", json!("Implement round robin algorithm")),
            ]),
        ],
    }
}

fn exams() -> FolderTemplate {
    FolderTemplate {
        id: "exams",
        name: "Exam Tracker",
        description: "Keep track of your exams and grades",
        schema: Schema::new(vec![
            Field::new("subject", "Subject", FieldType::Text).required(),
            Field::new("examDate", "Exam Date", FieldType::Date).required(),
            Field::new("grade", "Grade", FieldType::Text),
            Field::new("totalMarks", "Total Marks", FieldType::Number),
            Field::new("status", "Status", FieldType::Select)
                .required()
                .with_options(["Upcoming", "Completed", "Graded"]),
        ]),
        example_items: vec![item(&[
            ("subject", json!("Mathematics")),
            ("examDate", json!("2024-02-15")),
            ("grade", json!("A")),
            ("totalMarks", json!(95)),
            ("status", json!("Graded")),
        ])],
    }
}

fn study_notes() -> FolderTemplate {
    FolderTemplate {
        id: "notes",
        name: "Study Notes",
        description: "Organize your study notes",
        schema: Schema::new(vec![
            Field::new("subject", "Subject", FieldType::Text).required(),
            Field::new("topic", "Topic", FieldType::Text).required(),
            Field::new("content", "Notes", FieldType::Textarea).required(),
            Field::new("date", "Date", FieldType::Date),
        ]),
        example_items: vec![item(&[
            ("subject", json!("Computer Networks")),
            ("topic", json!("OSI Model")),
            (
                "content",
                json!("7 layers: Physical, Data Link, Network, Transport, Session, Presentation, Application"),
            ),
            ("date", json!("2024-01-15")),
        ])],
    }
}

fn orders() -> FolderTemplate {
    FolderTemplate {
        id: "orders",
        name: "Orders",
        description: "Manage customer orders",
        schema: Schema::new(vec![
            Field::new("orderNumber", "Order Number", FieldType::Text).required(),
            Field::new("customerName", "Customer Name", FieldType::Text).required(),
            Field::new("amount", "Amount (₹)", FieldType::Number).required(),
            Field::new("status", "Status", FieldType::Select)
                .required()
                .with_options(["Pending", "Processing", "Shipped", "Delivered", "Cancelled"]),
            Field::new("orderDate", "Order Date", FieldType::Date).required(),
        ]),
        example_items: vec![item(&[
            ("orderNumber", json!("ORD-001")),
            ("customerName", json!("Rahul Kumar")),
            ("amount", json!(5000)),
            ("status", json!("Delivered")),
            ("orderDate", json!("2024-01-10")),
        ])],
    }
}

fn customers() -> FolderTemplate {
    FolderTemplate {
        id: "customers",
        name: "Customers",
        description: "Track your customer information",
        schema: Schema::new(vec![
            Field::new("name", "Name", FieldType::Text).required(),
            Field::new("email", "Email", FieldType::Email),
            Field::new("phone", "Phone", FieldType::Text).required(),
            Field::new("city", "City", FieldType::Text),
            Field::new("type", "Customer Type", FieldType::Select)
                .required()
                .with_options(["Regular", "Premium", "VIP"]),
        ]),
        example_items: vec![item(&[
            ("name", json!("Priya Sharma")),
            ("email", json!("priya@example.com")),
            ("phone", json!("9876543210")),
            ("city", json!("Chennai")),
            ("type", json!("Premium")),
        ])],
    }
}

fn expenses() -> FolderTemplate {
    FolderTemplate {
        id: "expenses",
        name: "Expenses",
        description: "Track business expenses",
        schema: Schema::new(vec![
            Field::new("description", "Description", FieldType::Text).required(),
            Field::new("amount", "Amount (₹)", FieldType::Number).required(),
            Field::new("category", "Category", FieldType::Select)
                .required()
                .with_options([
                    "Office Supplies",
                    "Travel",
                    "Food",
                    "Utilities",
                    "Salary",
                    "Other",
                ]),
            Field::new("date", "Date", FieldType::Date).required(),
            Field::new("paymentMethod", "Payment Method", FieldType::Select)
                .with_options(["Cash", "Card", "UPI", "Bank Transfer"]),
        ]),
        example_items: vec![item(&[
            ("description", json!("Office rent")),
            ("amount", json!(15000)),
            ("category", json!("Utilities")),
            ("date", json!("2024-01-01")),
            ("paymentMethod", json!("Bank Transfer")),
        ])],
    }
}

fn projects() -> FolderTemplate {
    FolderTemplate {
        id: "projects",
        name: "Projects",
        description: "Track your personal or work projects",
        schema: Schema::new(vec![
            Field::new("name", "Project Name", FieldType::Text).required(),
            Field::new("description", "Description", FieldType::Textarea),
            Field::new("status", "Status", FieldType::Select)
                .required()
                .with_options(["Planning", "In Progress", "Completed", "On Hold"]),
            Field::new("progress", "Progress (%)", FieldType::Number),
            Field::new("startDate", "Start Date", FieldType::Date),
        ]),
        example_items: vec![item(&[
            ("name", json!("Portfolio Site")),
            ("description", json!("Personal portfolio and blog")),
            ("status", json!("In Progress")),
            ("progress", json!(75)),
            ("startDate", json!("2024-01-01")),
        ])],
    }
}

fn tasks() -> FolderTemplate {
    FolderTemplate {
        id: "tasks",
        name: "Tasks",
        description: "Your personal to-do list",
        schema: Schema::new(vec![
            Field::new("task", "Task", FieldType::Text).required(),
            Field::new("priority", "Priority", FieldType::Select)
                .required()
                .with_options(["Low", "Medium", "High", "Urgent"]),
            Field::new("status", "Status", FieldType::Select)
                .required()
                .with_options(["To Do", "In Progress", "Done"]),
            Field::new("dueDate", "Due Date", FieldType::Date),
        ]),
        example_items: vec![item(&[
            ("task", json!("Publish portfolio frontend")),
            ("priority", json!("High")),
            ("status", json!("In Progress")),
            ("dueDate", json!("2024-01-20")),
        ])],
    }
}

fn goals() -> FolderTemplate {
    FolderTemplate {
        id: "goals",
        name: "Goals Tracker",
        description: "Track your personal goals",
        schema: Schema::new(vec![
            Field::new("goal", "Goal", FieldType::Text).required(),
            Field::new("category", "Category", FieldType::Select)
                .required()
                .with_options(["Health", "Career", "Learning", "Finance", "Personal"]),
            Field::new("target", "Target", FieldType::Text),
            Field::new("progress", "Progress (%)", FieldType::Number),
            Field::new("deadline", "Deadline", FieldType::Date),
        ]),
        example_items: vec![item(&[
            ("goal", json!("Learn Rust")),
            ("category", json!("Learning")),
            ("target", json!("Build 5 projects")),
            ("progress", json!(60)),
            ("deadline", json!("2024-03-31")),
        ])],
    }
}
