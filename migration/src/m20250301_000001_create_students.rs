use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::FirstName).string().not_null())
                    .col(ColumnDef::new(Students::LastName).string().not_null())
                    .col(ColumnDef::new(Students::Gender).string().not_null())
                    .col(
                        ColumnDef::new(Students::ClassType)
                            .string()
                            .not_null()
                            .default("social_science"),
                    )
                    // 社会科学科目
                    .col(ColumnDef::new(Students::KhmerScore).double().null())
                    .col(
                        ColumnDef::new(Students::MathScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Students::HistoryScore).double().null())
                    .col(ColumnDef::new(Students::GeographyScore).double().null())
                    .col(ColumnDef::new(Students::EthicsScore).double().null())
                    .col(
                        ColumnDef::new(Students::EarthScienceScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    // 自然科学科目
                    .col(ColumnDef::new(Students::ChemistryScore).double().null())
                    .col(ColumnDef::new(Students::PhysicsScore).double().null())
                    .col(ColumnDef::new(Students::BiologyScore).double().null())
                    .col(
                        ColumnDef::new(Students::PhysicalEducationScore)
                            .double()
                            .null(),
                    )
                    // 外语（加分科目）
                    .col(
                        ColumnDef::new(Students::ForeignLanguageScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    // 各科满分
                    .col(ColumnDef::new(Students::KhmerMax).double().null())
                    .col(
                        ColumnDef::new(Students::MathMax)
                            .double()
                            .not_null()
                            .default(75.0),
                    )
                    .col(ColumnDef::new(Students::HistoryMax).double().null())
                    .col(ColumnDef::new(Students::GeographyMax).double().null())
                    .col(ColumnDef::new(Students::EthicsMax).double().null())
                    .col(
                        ColumnDef::new(Students::EarthScienceMax)
                            .double()
                            .not_null()
                            .default(50.0),
                    )
                    .col(ColumnDef::new(Students::ChemistryMax).double().null())
                    .col(ColumnDef::new(Students::PhysicsMax).double().null())
                    .col(ColumnDef::new(Students::BiologyMax).double().null())
                    .col(
                        ColumnDef::new(Students::PhysicalEducationMax)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Students::ForeignLanguageMax)
                            .double()
                            .not_null()
                            .default(50.0),
                    )
                    // 计算字段
                    .col(
                        ColumnDef::new(Students::TotalScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Students::AverageScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Students::Grade)
                            .string()
                            .not_null()
                            .default("F"),
                    )
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_class_type")
                    .table(Students::Table)
                    .col(Students::ClassType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_grade")
                    .table(Students::Table)
                    .col(Students::Grade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_name")
                    .table(Students::Table)
                    .col(Students::LastName)
                    .col(Students::FirstName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    FirstName,
    LastName,
    Gender,
    ClassType,
    KhmerScore,
    MathScore,
    HistoryScore,
    GeographyScore,
    EthicsScore,
    EarthScienceScore,
    ChemistryScore,
    PhysicsScore,
    BiologyScore,
    PhysicalEducationScore,
    ForeignLanguageScore,
    KhmerMax,
    MathMax,
    HistoryMax,
    GeographyMax,
    EthicsMax,
    EarthScienceMax,
    ChemistryMax,
    PhysicsMax,
    BiologyMax,
    PhysicalEducationMax,
    ForeignLanguageMax,
    TotalScore,
    AverageScore,
    Grade,
    CreatedAt,
    UpdatedAt,
}
