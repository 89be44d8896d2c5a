// src/services/aluno_service.rs
use crate::{
    error::{is_unique_violation, AppError, AppResult},
    models::aluno::{Aluno, AlunoFiltro, AlunoInput},
    services::turma_service,
};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor, SqlitePool};

fn aluno_nao_encontrado() -> AppError {
    AppError::NaoEncontrado("Aluno não encontrado".to_string())
}

fn email_duplicado(email: Option<&str>) -> AppError {
    AppError::Conflito(format!(
        "Já existe um aluno com o email '{}'",
        email.unwrap_or_default()
    ))
}

/// Substring sem distinção de maiúsculas, com regras Unicode (o `LOWER` do
/// SQLite só converte ASCII).
fn nome_contem(nome: &str, search: &str) -> bool {
    nome.to_lowercase().contains(&search.to_lowercase())
}

/// Lista alunos aplicando os filtros presentes (nome por substring, sem
/// distinção de maiúsculas; turma e status exatos).
pub async fn find_alunos(db_pool: &SqlitePool, filtro: &AlunoFiltro) -> AppResult<Vec<Aluno>> {
    tracing::debug!("Buscando alunos com filtro: {:?}", filtro);

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, nome, data_nascimento, email, status, turma_id FROM alunos WHERE 1 = 1",
    );
    if let Some(turma_id) = filtro.turma_id {
        qb.push(" AND turma_id = ").push_bind(turma_id);
    }
    if let Some(status) = &filtro.status {
        qb.push(" AND status = ").push_bind(status.clone());
    }
    qb.push(" ORDER BY id ASC");

    let mut alunos = qb.build_query_as::<Aluno>().fetch_all(db_pool).await?;
    if let Some(search) = &filtro.search {
        alunos.retain(|a| nome_contem(&a.nome, search));
    }
    tracing::debug!("Encontrados {} alunos.", alunos.len());
    Ok(alunos)
}

pub async fn find_aluno_by_id<'e, E>(executor: E, aluno_id: i64) -> AppResult<Option<Aluno>>
where
    E: SqliteExecutor<'e>,
{
    tracing::debug!("Buscando aluno por ID: {}", aluno_id);
    let aluno = sqlx::query_as::<_, Aluno>(
        r#"
        SELECT id, nome, data_nascimento, email, status, turma_id
        FROM alunos
        WHERE id = ?1
        "#,
    )
    .bind(aluno_id)
    .fetch_optional(executor)
    .await?;
    Ok(aluno)
}

/// Confirma que a turma existe e ainda tem vaga para mais um aluno.
async fn verificar_turma_com_vaga(
    conn: &mut SqliteConnection,
    turma_id: i64,
    ignorar_aluno: Option<i64>,
) -> AppResult<()> {
    let turma = turma_service::find_turma_by_id(&mut *conn, turma_id)
        .await?
        .ok_or_else(|| AppError::NaoEncontrado("Turma não encontrada".to_string()))?;
    let ocupacao = turma_service::contar_ocupacao(&mut *conn, turma_id, ignorar_aluno).await?;
    if ocupacao >= turma.capacidade {
        tracing::warn!(
            "Turma {} cheia ({}/{}).",
            turma_id,
            ocupacao,
            turma.capacidade
        );
        return Err(AppError::CapacidadeExcedida("Turma cheia".to_string()));
    }
    Ok(())
}

pub async fn create_aluno(db_pool: &SqlitePool, input: &AlunoInput) -> AppResult<Aluno> {
    tracing::info!("Tentando criar aluno: {}", input.nome);
    let mut conn = db_pool.acquire().await?;

    if let Some(turma_id) = input.turma_id {
        verificar_turma_com_vaga(&mut *conn, turma_id, None).await?;
    }

    let result = sqlx::query_as::<_, Aluno>(
        r#"
        INSERT INTO alunos (nome, data_nascimento, email, status, turma_id)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING id, nome, data_nascimento, email, status, turma_id
        "#,
    )
    .bind(&input.nome)
    .bind(input.data_nascimento)
    .bind(&input.email)
    .bind(&input.status)
    .bind(input.turma_id)
    .fetch_one(&mut *conn)
    .await;

    match result {
        Ok(aluno) => {
            tracing::info!("✅ Aluno '{}' criado com id {}.", aluno.nome, aluno.id);
            Ok(aluno)
        }
        Err(e) if is_unique_violation(&e) => {
            tracing::warn!("Falha ao criar aluno: email {:?} já existe.", input.email);
            Err(email_duplicado(input.email.as_deref()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Substitui todos os campos do aluno pelos do input (não é um merge parcial).
pub async fn update_aluno(
    db_pool: &SqlitePool,
    aluno_id: i64,
    input: &AlunoInput,
) -> AppResult<Aluno> {
    tracing::info!("Atualizando dados para aluno: {}", aluno_id);
    let mut conn = db_pool.acquire().await?;

    if find_aluno_by_id(&mut *conn, aluno_id).await?.is_none() {
        tracing::warn!(
            "Falha ao atualizar dados: Aluno '{}' não encontrado.",
            aluno_id
        );
        return Err(aluno_nao_encontrado());
    }

    if let Some(turma_id) = input.turma_id {
        verificar_turma_com_vaga(&mut *conn, turma_id, Some(aluno_id)).await?;
    }

    let result = sqlx::query_as::<_, Aluno>(
        r#"
        UPDATE alunos
        SET
            nome = ?1,
            data_nascimento = ?2,
            email = ?3,
            status = ?4,
            turma_id = ?5
        WHERE id = ?6
        RETURNING id, nome, data_nascimento, email, status, turma_id
        "#,
    )
    .bind(&input.nome)
    .bind(input.data_nascimento)
    .bind(&input.email)
    .bind(&input.status)
    .bind(input.turma_id)
    .bind(aluno_id)
    .fetch_optional(&mut *conn)
    .await;

    match result {
        Ok(Some(aluno)) => {
            tracing::info!("✅ Dados atualizados com sucesso para aluno: {}", aluno_id);
            Ok(aluno)
        }
        // Removido entre a verificação e o UPDATE
        Ok(None) => Err(aluno_nao_encontrado()),
        Err(e) if is_unique_violation(&e) => {
            tracing::warn!(
                "Falha ao atualizar aluno {}: email {:?} já existe.",
                aluno_id,
                input.email
            );
            Err(email_duplicado(input.email.as_deref()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_aluno(db_pool: &SqlitePool, aluno_id: i64) -> AppResult<()> {
    tracing::info!("Removendo aluno: {}", aluno_id);
    let rows_affected = sqlx::query("DELETE FROM alunos WHERE id = ?1")
        .bind(aluno_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao remover: Aluno '{}' não encontrado.", aluno_id);
        Err(aluno_nao_encontrado())
    } else {
        tracing::info!("✅ Aluno {} removido.", aluno_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::create_test_pool,
        models::{aluno::STATUS_INATIVO, turma::TurmaInput},
    };
    use chrono::NaiveDate;

    fn input(nome: &str, email: Option<&str>) -> AlunoInput {
        AlunoInput {
            nome: nome.into(),
            data_nascimento: NaiveDate::from_ymd_opt(2012, 3, 4).unwrap(),
            email: email.map(str::to_string),
            status: STATUS_INATIVO.into(),
            turma_id: None,
        }
    }

    async fn turma(pool: &SqlitePool, nome: &str, capacidade: i64) -> i64 {
        turma_service::create_turma(
            pool,
            &TurmaInput {
                nome: nome.into(),
                capacidade,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn cria_e_busca_aluno() {
        let pool = create_test_pool().await;
        let criado = create_aluno(&pool, &input("Ana Silva", Some("ana@escola.test")))
            .await
            .unwrap();
        assert_eq!(criado.status, STATUS_INATIVO);
        assert_eq!(criado.turma_id, None);

        let lido = find_aluno_by_id(&pool, criado.id).await.unwrap();
        assert_eq!(lido, Some(criado));
    }

    #[tokio::test]
    async fn email_duplicado_e_conflito() {
        let pool = create_test_pool().await;
        create_aluno(&pool, &input("Ana Silva", Some("ana@escola.test")))
            .await
            .unwrap();
        let err = create_aluno(&pool, &input("Ana Souza", Some("ana@escola.test")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflito(_)));

        // sem email não há conflito
        create_aluno(&pool, &input("Bruno Silva", None)).await.unwrap();
        create_aluno(&pool, &input("Carla Silva", None)).await.unwrap();
    }

    #[tokio::test]
    async fn filtros_da_listagem() {
        let pool = create_test_pool().await;
        let t = turma(&pool, "1A", 5).await;

        let mut ana = input("Ana Silva", None);
        ana.turma_id = Some(t);
        ana.status = "ativo".into();
        create_aluno(&pool, &ana).await.unwrap();
        create_aluno(&pool, &input("Bruno Silva", None)).await.unwrap();
        create_aluno(&pool, &input("Carla 100%", None)).await.unwrap();

        let todos = find_alunos(&pool, &AlunoFiltro::default()).await.unwrap();
        assert_eq!(todos.len(), 3);

        let por_nome = find_alunos(
            &pool,
            &AlunoFiltro {
                search: Some("SILVA".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(por_nome.len(), 2);

        let literal = find_alunos(
            &pool,
            &AlunoFiltro {
                search: Some("0%".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(literal.len(), 1);

        let por_turma = find_alunos(
            &pool,
            &AlunoFiltro {
                turma_id: Some(t),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(por_turma.len(), 1);
        assert_eq!(por_turma[0].nome, "Ana Silva");

        let inativos = find_alunos(
            &pool,
            &AlunoFiltro {
                status: Some(STATUS_INATIVO.into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(inativos.len(), 2);
    }

    #[tokio::test]
    async fn pesquisa_ignora_maiusculas_acentuadas() {
        let pool = create_test_pool().await;
        create_aluno(&pool, &input("Quésia Silva", None)).await.unwrap();
        create_aluno(&pool, &input("Élio Souza", None)).await.unwrap();
        create_aluno(&pool, &input("Bruno Silva", None)).await.unwrap();

        for (search, esperado) in [("QUÉSIA", "Quésia Silva"), ("élio", "Élio Souza")] {
            let encontrados = find_alunos(
                &pool,
                &AlunoFiltro {
                    search: Some(search.into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
            let nomes: Vec<_> = encontrados.iter().map(|a| a.nome.as_str()).collect();
            assert_eq!(nomes, vec![esperado], "search = {}", search);
        }
    }

    #[tokio::test]
    async fn criar_com_turma_inexistente_ou_cheia() {
        let pool = create_test_pool().await;
        let mut a = input("Ana Silva", None);
        a.turma_id = Some(77);
        let err = create_aluno(&pool, &a).await.unwrap_err();
        assert!(matches!(err, AppError::NaoEncontrado(_)));

        let t = turma(&pool, "1A", 1).await;
        a.turma_id = Some(t);
        create_aluno(&pool, &a).await.unwrap();
        let mut b = input("Bruno Silva", None);
        b.turma_id = Some(t);
        let err = create_aluno(&pool, &b).await.unwrap_err();
        assert!(matches!(err, AppError::CapacidadeExcedida(_)));
    }

    #[tokio::test]
    async fn update_substitui_todos_os_campos() {
        let pool = create_test_pool().await;
        let t = turma(&pool, "1A", 1).await;
        let mut original = input("Ana Silva", Some("ana@escola.test"));
        original.turma_id = Some(t);
        original.status = "ativo".into();
        let criado = create_aluno(&pool, &original).await.unwrap();

        // O próprio aluno não conta para a lotação da sua turma
        let mut mesmo = original.clone();
        mesmo.nome = "Ana Maria Silva".into();
        let atualizado = update_aluno(&pool, criado.id, &mesmo).await.unwrap();
        assert_eq!(atualizado.turma_id, Some(t));
        assert_eq!(atualizado.nome, "Ana Maria Silva");

        // Campos omitidos no PUT perdem o valor guardado
        let so_nome: AlunoInput = serde_json::from_str(
            r#"{"nome":"Ana Silva","data_nascimento":"2012-03-04"}"#,
        )
        .unwrap();
        let atualizado = update_aluno(&pool, criado.id, &so_nome).await.unwrap();
        assert_eq!(atualizado.email, None);
        assert_eq!(atualizado.turma_id, None);
        assert_eq!(atualizado.status, STATUS_INATIVO);
    }

    #[tokio::test]
    async fn update_com_email_duplicado_e_conflito() {
        let pool = create_test_pool().await;
        create_aluno(&pool, &input("Ana Silva", Some("ana@escola.test")))
            .await
            .unwrap();
        let bruno = create_aluno(&pool, &input("Bruno Silva", Some("bruno@escola.test")))
            .await
            .unwrap();

        let err = update_aluno(&pool, bruno.id, &input("Bruno Silva", Some("ana@escola.test")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflito(_)));

        // o registo do Bruno fica como estava
        let guardado = find_aluno_by_id(&pool, bruno.id).await.unwrap().unwrap();
        assert_eq!(guardado.email.as_deref(), Some("bruno@escola.test"));

        // manter o próprio email não é conflito
        update_aluno(&pool, bruno.id, &input("Bruno Costa", Some("bruno@escola.test")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_inexistente_e_nao_encontrado() {
        let pool = create_test_pool().await;
        let err = update_aluno(&pool, 5, &input("Ana Silva", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NaoEncontrado(_)));
    }

    #[tokio::test]
    async fn delete_remove_da_listagem() {
        let pool = create_test_pool().await;
        let a = create_aluno(&pool, &input("Ana Silva", None)).await.unwrap();

        let err = delete_aluno(&pool, a.id + 1).await.unwrap_err();
        assert!(matches!(err, AppError::NaoEncontrado(_)));

        delete_aluno(&pool, a.id).await.unwrap();
        assert!(find_alunos(&pool, &AlunoFiltro::default())
            .await
            .unwrap()
            .is_empty());
    }
}
